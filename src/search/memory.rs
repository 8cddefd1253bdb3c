//! In-memory search backend.
//!
//! Stores per-field term frequencies for each document and scores queries
//! with BM25. There is no persistence and no postings structure: search is a
//! scan over all documents, which is fine for the corpus sizes this backend
//! is meant for (tests, examples, small CLI corpora).

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::tokenize;
use crate::error::{Result, Rm3Error};
use crate::query::{BooleanQuery, Occur, Query, TermQuery};
use crate::search::{DocFilter, SearchBackend, SearchHit, TermFrequencies};

/// BM25 k1 parameter.
const K1: f32 = 1.2;
/// BM25 b parameter.
const B: f32 = 0.75;

#[derive(Debug, Clone, Default)]
struct FieldEntry {
    freqs: TermFrequencies,
    length: u64,
}

impl FieldEntry {
    fn new(freqs: TermFrequencies) -> Self {
        let length = freqs.values().sum();
        FieldEntry { freqs, length }
    }
}

/// Collection-level statistics for one field, gathered per search.
#[derive(Debug, Clone, Copy)]
struct FieldStats {
    doc_count: u64,
    avg_length: f32,
}

/// Statistics needed to score one query against the current document set.
#[derive(Debug, Default)]
struct QueryStats {
    fields: HashMap<String, FieldStats>,
    doc_freqs: HashMap<(String, String), u64>,
}

/// A search backend holding all documents in memory.
///
/// Safe to share between threads; writers take an exclusive lock.
///
/// ```
/// use std::sync::Arc;
///
/// use rm3::analysis::analyzer::StandardAnalyzer;
/// use rm3::query::TermQuery;
/// use rm3::search::{MemoryBackend, SearchBackend};
///
/// let backend = MemoryBackend::new(Arc::new(StandardAnalyzer::new()));
/// backend.add_text(1, "contents", "Cats chase mice").unwrap();
/// backend.add_text(2, "contents", "Dogs chase cats").unwrap();
///
/// let hits = backend.search(&TermQuery::new("contents", "mice"), None, 10).unwrap();
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].doc_id, 1);
/// ```
pub struct MemoryBackend {
    analyzer: Arc<dyn Analyzer>,
    documents: RwLock<BTreeMap<u64, AHashMap<String, FieldEntry>>>,
}

impl MemoryBackend {
    /// Create an empty backend analyzing text with `analyzer`.
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        MemoryBackend {
            analyzer,
            documents: RwLock::new(BTreeMap::new()),
        }
    }

    /// Analyze `text` and store it as `field` of document `doc_id`,
    /// replacing any previous content of that field.
    pub fn add_text(&self, doc_id: u64, field: &str, text: &str) -> Result<()> {
        let mut freqs = TermFrequencies::new();
        for term in tokenize(self.analyzer.as_ref(), text)? {
            *freqs.entry(term).or_insert(0) += 1;
        }
        self.add_term_vector(doc_id, field, freqs);
        Ok(())
    }

    /// Store pre-analyzed term frequencies as `field` of document `doc_id`.
    pub fn add_term_vector(&self, doc_id: u64, field: &str, freqs: TermFrequencies) {
        self.documents
            .write()
            .entry(doc_id)
            .or_default()
            .insert(field.to_string(), FieldEntry::new(freqs));
    }

    /// Remove a document. Returns whether it existed.
    pub fn remove_document(&self, doc_id: u64) -> bool {
        self.documents.write().remove(&doc_id).is_some()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Whether the backend holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Ids of all stored documents in ascending order.
    pub fn doc_ids(&self) -> Vec<u64> {
        self.documents.read().keys().copied().collect()
    }

    fn collect_stats(
        query: &dyn Query,
        documents: &BTreeMap<u64, AHashMap<String, FieldEntry>>,
        stats: &mut QueryStats,
    ) {
        if let Some(term_query) = query.as_any().downcast_ref::<TermQuery>() {
            let field = term_query.field().unwrap_or_default();

            if !stats.fields.contains_key(field) {
                let (doc_count, total_length) = documents
                    .values()
                    .filter_map(|fields| fields.get(field))
                    .fold((0u64, 0u64), |(count, total), entry| {
                        (count + 1, total + entry.length)
                    });
                let avg_length = if doc_count == 0 {
                    0.0
                } else {
                    total_length as f32 / doc_count as f32
                };
                stats.fields.insert(
                    field.to_string(),
                    FieldStats {
                        doc_count,
                        avg_length,
                    },
                );
            }

            let key = (field.to_string(), term_query.term().to_string());
            if !stats.doc_freqs.contains_key(&key) {
                let df = documents
                    .values()
                    .filter_map(|fields| fields.get(field))
                    .filter(|entry| entry.freqs.get(term_query.term()).copied().unwrap_or(0) > 0)
                    .count() as u64;
                stats.doc_freqs.insert(key, df);
            }
        } else if let Some(boolean) = query.as_any().downcast_ref::<BooleanQuery>() {
            for clause in boolean.clauses() {
                Self::collect_stats(clause.query.as_ref(), documents, stats);
            }
        }
    }

    /// Lucene-style BM25 with a non-negative idf.
    fn bm25(tf: f32, doc_length: f32, df: u64, field: FieldStats) -> f32 {
        let n = field.doc_count as f32;
        let df = df as f32;
        let idf = (1.0 + (n - df + 0.5) / (df + 0.5)).ln();

        let avg_len = if field.avg_length > 0.0 {
            field.avg_length
        } else {
            1.0
        };
        let norm_factor = 1.0 - B + B * (doc_length / avg_len);

        idf * (tf * (K1 + 1.0)) / (tf + K1 * norm_factor)
    }

    /// Score `query` against one document. `None` means the document does not match.
    fn score(
        query: &dyn Query,
        fields: &AHashMap<String, FieldEntry>,
        stats: &QueryStats,
    ) -> Result<Option<f32>> {
        if let Some(term_query) = query.as_any().downcast_ref::<TermQuery>() {
            let field = term_query.field().unwrap_or_default();
            let Some(entry) = fields.get(field) else {
                return Ok(None);
            };
            let tf = entry.freqs.get(term_query.term()).copied().unwrap_or(0);
            if tf == 0 {
                return Ok(None);
            }

            let field_stats = stats.fields[field];
            let df = stats.doc_freqs[&(field.to_string(), term_query.term().to_string())];
            let score = Self::bm25(tf as f32, entry.length as f32, df, field_stats);
            return Ok(Some(term_query.boost() * score));
        }

        if let Some(boolean) = query.as_any().downcast_ref::<BooleanQuery>() {
            let mut total = 0.0;
            let mut has_required = false;
            let mut should_matches = 0;

            for clause in boolean.clauses() {
                let clause_score = Self::score(clause.query.as_ref(), fields, stats)?;
                match (clause.occur, clause_score) {
                    (Occur::Must, Some(score)) => {
                        has_required = true;
                        total += score;
                    }
                    (Occur::Must, None) => return Ok(None),
                    (Occur::MustNot, Some(_)) => return Ok(None),
                    (Occur::MustNot, None) => {}
                    (Occur::Should, Some(score)) => {
                        should_matches += 1;
                        total += score;
                    }
                    (Occur::Should, None) => {}
                }
            }

            if should_matches < boolean.minimum_should_match() {
                return Ok(None);
            }
            if !has_required && should_matches == 0 {
                return Ok(None);
            }
            return Ok(Some(boolean.boost() * total));
        }

        Err(Rm3Error::query(format!(
            "Unsupported query type for in-memory search: {}",
            query.description()
        )))
    }
}

impl SearchBackend for MemoryBackend {
    fn term_vector(&self, doc_id: u64, field: &str) -> Result<TermFrequencies> {
        let documents = self.documents.read();
        let fields = documents
            .get(&doc_id)
            .ok_or_else(|| Rm3Error::not_found(format!("document {doc_id}")))?;
        fields
            .get(field)
            .map(|entry| entry.freqs.clone())
            .ok_or_else(|| Rm3Error::not_found(format!("term vector for {doc_id}:{field}")))
    }

    fn search(
        &self,
        query: &dyn Query,
        filter: Option<&dyn DocFilter>,
        max_results: usize,
    ) -> Result<Vec<SearchHit>> {
        let documents = self.documents.read();

        let mut stats = QueryStats::default();
        Self::collect_stats(query, &documents, &mut stats);

        let mut hits = Vec::new();
        for (&doc_id, fields) in documents.iter() {
            if filter.is_some_and(|f| !f.accept(doc_id)) {
                continue;
            }
            if let Some(score) = Self::score(query, fields, &stats)? {
                hits.push(SearchHit::new(doc_id, score));
            }
        }

        // Sort by score descending, then by doc_id for consistent results
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        hits.truncate(max_results);

        Ok(hits)
    }
}

impl fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("analyzer", &self.analyzer.name())
            .field("documents", &self.len())
            .finish()
    }
}

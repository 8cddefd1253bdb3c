//! Integration tests for the RM3 reranker against search backends.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rm3::prelude::*;
use rm3::query::BooleanQueryBuilder;
use rm3::rm3::Stage;
use rm3::search::TermFrequencies;
use tempfile::NamedTempFile;

fn term_vector(entries: &[(&str, u64)]) -> TermFrequencies {
    entries
        .iter()
        .map(|&(term, freq)| (term.to_string(), freq))
        .collect()
}

fn cat_backend() -> Arc<MemoryBackend> {
    let backend = Arc::new(MemoryBackend::new(Arc::new(StandardAnalyzer::new())));
    backend.add_term_vector(1, "contents", term_vector(&[("cat", 3), ("dog", 1)]));
    backend.add_term_vector(2, "contents", term_vector(&[("cat", 1), ("bird", 2)]));
    backend
}

fn cat_reranker() -> Rm3Reranker {
    let config = Rm3Config::default()
        .with_fb_docs(2)
        .with_fb_terms(3)
        .with_original_query_weight(0.5);
    Rm3Reranker::new(Arc::new(StandardAnalyzer::new()), config).unwrap()
}

/// Delegates to a memory backend but fails term vector lookups.
#[derive(Debug)]
struct FailingTermVectors {
    inner: Arc<MemoryBackend>,
    searches: AtomicUsize,
}

impl SearchBackend for FailingTermVectors {
    fn term_vector(&self, doc_id: u64, _field: &str) -> Result<TermFrequencies> {
        Err(Rm3Error::backend(format!("term vector store offline for {doc_id}")))
    }

    fn search(
        &self,
        query: &dyn Query,
        filter: Option<&dyn DocFilter>,
        max_results: usize,
    ) -> Result<Vec<SearchHit>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.inner.search(query, filter, max_results)
    }
}

/// Serves term vectors but rejects every query.
#[derive(Debug)]
struct FailingSearch {
    inner: Arc<MemoryBackend>,
}

impl SearchBackend for FailingSearch {
    fn term_vector(&self, doc_id: u64, field: &str) -> Result<TermFrequencies> {
        self.inner.term_vector(doc_id, field)
    }

    fn search(
        &self,
        _query: &dyn Query,
        _filter: Option<&dyn DocFilter>,
        _max_results: usize,
    ) -> Result<Vec<SearchHit>> {
        Err(Rm3Error::backend("search timed out"))
    }
}

/// Records the query string handed to the parser.
#[derive(Debug, Default)]
struct RecordingParser {
    inner: Option<Arc<MemoryBackend>>,
    seen: parking_lot::Mutex<Vec<String>>,
}

impl SearchBackend for RecordingParser {
    fn term_vector(&self, doc_id: u64, field: &str) -> Result<TermFrequencies> {
        match &self.inner {
            Some(inner) => inner.term_vector(doc_id, field),
            None => Err(Rm3Error::not_found("no backend")),
        }
    }

    fn search(
        &self,
        _query: &dyn Query,
        _filter: Option<&dyn DocFilter>,
        _max_results: usize,
    ) -> Result<Vec<SearchHit>> {
        Ok(vec![SearchHit::new(2, 9.0), SearchHit::new(1, 4.0)])
    }

    fn parse_query(&self, field: &str, query_text: &str) -> Result<Box<dyn Query>> {
        self.seen.lock().push(query_text.to_string());
        QueryParser::new(field).parse(query_text)
    }
}

/// Serves term vectors but cannot parse any query.
#[derive(Debug)]
struct RejectingParser {
    inner: Arc<MemoryBackend>,
    searches: AtomicUsize,
}

impl SearchBackend for RejectingParser {
    fn term_vector(&self, doc_id: u64, field: &str) -> Result<TermFrequencies> {
        self.inner.term_vector(doc_id, field)
    }

    fn search(
        &self,
        query: &dyn Query,
        filter: Option<&dyn DocFilter>,
        max_results: usize,
    ) -> Result<Vec<SearchHit>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.inner.search(query, filter, max_results)
    }

    fn parse_query(&self, _field: &str, query_text: &str) -> Result<Box<dyn Query>> {
        Err(Rm3Error::parse(format!("unsupported syntax in '{query_text}'")))
    }
}

#[test]
fn test_cat_example_ranks_cat_highest() -> Result<()> {
    let reranker = cat_reranker();
    let context = RerankerContext::new("cat", cat_backend());
    let docs = ScoredDocuments::new(vec![1, 2], vec![2.0, 1.0]);

    let model = reranker.estimator().estimate(&docs, context.backend.as_ref())?;
    assert_eq!(model.ordered()[0].0, "cat");
    assert!(model.feature_weight("dog") > 0.0);
    assert!(model.feature_weight("bird") > 0.0);

    let expanded = reranker.expand(&docs, &context)?;
    let cat = expanded.feature_weight("cat");
    assert!(cat >= expanded.feature_weight("dog"));
    assert!(cat >= expanded.feature_weight("bird"));

    let reranked = reranker.rerank(docs, &context);
    assert_eq!(reranked.len(), 2);
    assert!(reranked.scores.windows(2).all(|w| w[0] >= w[1]));

    Ok(())
}

#[test]
fn test_expanded_query_string_reaches_parser() {
    let backend = Arc::new(RecordingParser {
        inner: Some(cat_backend()),
        ..Default::default()
    });
    let context = RerankerContext::new("cat", backend.clone());
    let docs = ScoredDocuments::new(vec![1, 2], vec![2.0, 1.0]);

    let reranked = cat_reranker().rerank(docs, &context);
    assert_eq!(reranked.ids, vec![2, 1]);
    assert_eq!(reranked.scores, vec![9.0, 4.0]);

    let seen = backend.seen.lock();
    assert_eq!(seen.len(), 1);
    let entries: Vec<&str> = seen[0].split(' ').collect();
    assert_eq!(entries.len(), 3);
    assert!(entries[0].starts_with("cat^"));
    assert!(entries.iter().all(|entry| entry.contains('^')));
}

#[test]
fn test_term_vector_failure_returns_input_unchanged() {
    let backend = Arc::new(FailingTermVectors {
        inner: cat_backend(),
        searches: AtomicUsize::new(0),
    });
    let context = RerankerContext::new("cat", backend.clone()).with_query_id("q1");
    let docs = ScoredDocuments::new(vec![2, 1], vec![1.5, 0.5]);

    let (reranked, stage) = cat_reranker().rerank_with_stage(docs.clone(), &context);
    assert_eq!(stage, Stage::FailedPassthrough);
    assert_eq!(reranked.ids, docs.ids);
    assert_eq!(reranked.scores, docs.scores);
    assert_eq!(backend.searches.load(Ordering::SeqCst), 0);
}

#[test]
fn test_search_failure_returns_input_unchanged() {
    let backend = Arc::new(FailingSearch {
        inner: cat_backend(),
    });
    let context = RerankerContext::new("cat", backend);
    let docs = ScoredDocuments::new(vec![1, 2], vec![2.0, 1.0]);

    let reranked = cat_reranker().rerank(docs.clone(), &context);
    assert_eq!(reranked, docs);
}

#[test]
fn test_parse_failure_returns_input_unchanged() {
    let backend = Arc::new(RejectingParser {
        inner: cat_backend(),
        searches: AtomicUsize::new(0),
    });
    let context = RerankerContext::new("cat", backend.clone());
    let docs = ScoredDocuments::new(vec![2, 1], vec![1.5, 0.5]);

    let (reranked, stage) = cat_reranker().rerank_with_stage(docs.clone(), &context);
    assert_eq!(stage, Stage::FailedPassthrough);
    assert_eq!(reranked, docs);
    assert_eq!(backend.searches.load(Ordering::SeqCst), 0);
}

#[test]
fn test_colon_term_stays_in_configured_field() -> Result<()> {
    let analyzer = Arc::new(StandardAnalyzer::new());
    let backend = Arc::new(MemoryBackend::new(analyzer.clone()));
    backend.add_text(1, "contents", "re:invent keynote")?;
    backend.add_text(2, "contents", "keynote")?;
    backend.add_text(3, "contents", "re:invent")?;
    assert!(backend.term_vector(3, "contents")?.contains_key("re:invent"));

    let reranker = Rm3Reranker::new(analyzer, Rm3Config::default())?;
    let context = RerankerContext::new("re:invent", backend);
    let docs = ScoredDocuments::new(vec![1, 3], vec![1.0, 1.0]);

    let expanded = reranker.expand(&docs, &context)?;
    assert_eq!(expanded.ordered()[0].0, "re:invent");

    let (reranked, stage) = reranker.rerank_with_stage(docs, &context);
    assert_eq!(stage, Stage::Done);
    assert_eq!(reranked.len(), 3);
    let position = |id: u64| reranked.ids.iter().position(|&d| d == id);
    // doc 3 holds only the top-weighted expansion term, doc 2 only the weaker one
    assert!(position(3) < position(2));

    Ok(())
}

#[test]
#[should_panic]
fn test_length_mismatch_is_fatal() {
    let context = RerankerContext::new("cat", cat_backend());
    cat_reranker().rerank(ScoredDocuments::new(vec![1, 2, 3], vec![2.0, 1.0]), &context);
}

#[test]
fn test_interpolation_extremes() {
    let docs = ScoredDocuments::new(vec![1, 2], vec![2.0, 1.0]);
    let context = RerankerContext::new("cat dog", cat_backend());
    let analyzer = Arc::new(StandardAnalyzer::new());

    let query_only = Rm3Reranker::new(
        analyzer.clone(),
        Rm3Config::default().with_original_query_weight(1.0),
    )
    .unwrap()
    .expand(&docs, &context)
    .unwrap();
    assert!((query_only.feature_weight("cat") - 0.5).abs() < 1e-6);
    assert!((query_only.feature_weight("dog") - 0.5).abs() < 1e-6);
    assert_eq!(query_only.feature_weight("bird"), 0.0);

    let model_only = Rm3Reranker::new(
        analyzer,
        Rm3Config::default().with_original_query_weight(0.0),
    )
    .unwrap()
    .expand(&docs, &context)
    .unwrap();
    let estimated = RelevanceModelEstimator::new(50, 20, "contents", Arc::new(Stopper::empty()))
        .estimate(&docs, context.backend.as_ref())
        .unwrap();
    for (term, weight) in estimated.iter() {
        assert!((model_only.feature_weight(term) - weight).abs() < 1e-6);
    }
}

#[test]
fn test_stopword_file_excludes_feedback_terms() {
    use std::io::Write;

    let mut stopwords = NamedTempFile::new().unwrap();
    writeln!(stopwords, "dog").unwrap();

    let config = Rm3Config::default().with_stopword_file(stopwords.path());
    let reranker = Rm3Reranker::new(Arc::new(StandardAnalyzer::new()), config).unwrap();
    let context = RerankerContext::new("cat", cat_backend());

    let expanded = reranker
        .expand(&ScoredDocuments::new(vec![1, 2], vec![2.0, 1.0]), &context)
        .unwrap();
    assert!(!expanded.contains("dog"));
    assert!(expanded.contains("bird"));
}

#[test]
fn test_cascade_with_rm3_stage() {
    let analyzer = Arc::new(StandardAnalyzer::new());
    let backend = Arc::new(MemoryBackend::new(analyzer.clone()));
    backend.add_text(1, "contents", "cat cat dog").unwrap();
    backend.add_text(2, "contents", "cat bird bird").unwrap();
    backend.add_text(3, "contents", "bird fish").unwrap();

    let cascade = RerankerCascade::new()
        .add(IdentityReranker)
        .add(Rm3Reranker::new(analyzer, Rm3Config::default()).unwrap());
    assert_eq!(cascade.names(), vec!["identity", "rm3"]);

    let context = RerankerContext::new("cat", backend);
    let reranked = cascade.rerank(ScoredDocuments::new(vec![1, 2], vec![1.0, 0.9]), &context);
    // the expansion picks up "bird", so doc 3 is now reachable
    assert!(reranked.ids.contains(&3));
}

#[test]
fn test_batch_rerank_matches_sequential() {
    let analyzer = Arc::new(StandardAnalyzer::new());
    let backend = Arc::new(MemoryBackend::new(analyzer.clone()));
    let texts = [
        "the quick brown fox",
        "a lazy brown dog",
        "quick thinking fox",
        "dogs and foxes play",
        "brown bears",
    ];
    for (i, text) in texts.iter().enumerate() {
        backend.add_text(i as u64, "contents", text).unwrap();
    }
    let reranker = Rm3Reranker::new(analyzer, Rm3Config::default().with_fb_docs(3)).unwrap();

    let queries = ["fox", "brown", "dog", "quick fox"];
    let requests: Vec<_> = queries
        .iter()
        .map(|q| {
            let query = QueryParser::new("contents").parse(q).unwrap();
            let hits = backend.search(query.as_ref(), None, 1000).unwrap();
            (
                ScoredDocuments::from_hits(hits),
                RerankerContext::new(*q, backend.clone()),
            )
        })
        .collect();

    let sequential: Vec<_> = requests
        .iter()
        .map(|(docs, context)| reranker.rerank(docs.clone(), context))
        .collect();
    let parallel = rerank_batch(&reranker, requests);

    assert_eq!(parallel, sequential);
}

#[test]
fn test_must_not_filter_in_first_pass_and_rerank() {
    let analyzer = Arc::new(StandardAnalyzer::new());
    let backend = Arc::new(MemoryBackend::new(analyzer.clone()));
    backend.add_text(1, "contents", "cat food").unwrap();
    backend.add_text(2, "contents", "cat toys").unwrap();
    backend.add_text(3, "contents", "dog food").unwrap();

    let query = BooleanQueryBuilder::new()
        .should(Box::new(TermQuery::new("contents", "cat")))
        .must_not(Box::new(TermQuery::new("contents", "toys")))
        .build();
    let initial = ScoredDocuments::from_hits(backend.search(&query, None, 10).unwrap());
    assert_eq!(initial.ids, vec![1]);

    let context =
        RerankerContext::new("cat", backend.clone()).with_filter(Arc::new(DocIdFilter::new([1, 3])));
    let reranker = Rm3Reranker::new(analyzer, Rm3Config::default()).unwrap();
    let reranked = reranker.rerank(initial, &context);

    assert!(!reranked.ids.contains(&2));
    // "food" came in through feedback
    assert!(reranked.ids.contains(&3));
}

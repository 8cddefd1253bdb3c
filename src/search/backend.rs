//! The narrow interface the reranker calls into.

use std::fmt::Debug;

use crate::error::Result;
use crate::query::{Query, QueryParser};
use crate::search::{DocFilter, SearchHit, TermFrequencies};

/// A search engine the reranker can read term vectors from and run queries on.
///
/// Implementations must be safe to share across threads: independent
/// reranking requests may call the same backend concurrently.
pub trait SearchBackend: Send + Sync + Debug {
    /// Term frequencies of `field` in document `doc_id`.
    ///
    /// Returns an error when the document or its term vector is unavailable.
    fn term_vector(&self, doc_id: u64, field: &str) -> Result<TermFrequencies>;

    /// Execute `query`, keeping only documents accepted by `filter`, and
    /// return at most `max_results` hits ordered by descending score.
    fn search(
        &self,
        query: &dyn Query,
        filter: Option<&dyn DocFilter>,
        max_results: usize,
    ) -> Result<Vec<SearchHit>>;

    /// Parse a boosted-term query string against `field`.
    ///
    /// The default splits on whitespace only; terms are not re-analyzed.
    fn parse_query(&self, field: &str, query_text: &str) -> Result<Box<dyn Query>> {
        QueryParser::new(field).parse(query_text)
    }
}

//! The reranker trait and its per-query context.

use std::fmt;
use std::sync::Arc;

use crate::rerank::ScoredDocuments;
use crate::search::{DocFilter, SearchBackend};

/// Per-query context shared by every stage of a reranking cascade.
#[derive(Clone)]
pub struct RerankerContext {
    /// The user's original query text.
    pub query_text: String,
    /// Optional identifier of the query, for logging.
    pub query_id: Option<String>,
    /// Backend the first-pass ranking came from.
    pub backend: Arc<dyn SearchBackend>,
    /// Restriction applied to the first pass, reapplied on re-search.
    pub filter: Option<Arc<dyn DocFilter>>,
}

impl RerankerContext {
    pub fn new<S: Into<String>>(query_text: S, backend: Arc<dyn SearchBackend>) -> Self {
        RerankerContext {
            query_text: query_text.into(),
            query_id: None,
            backend,
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: Arc<dyn DocFilter>) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_query_id<S: Into<String>>(mut self, query_id: S) -> Self {
        self.query_id = Some(query_id.into());
        self
    }

    pub fn filter(&self) -> Option<&dyn DocFilter> {
        self.filter.as_deref()
    }

    /// Label used in log lines: the query id if set, otherwise the text.
    pub fn label(&self) -> &str {
        self.query_id.as_deref().unwrap_or(&self.query_text)
    }
}

impl fmt::Debug for RerankerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RerankerContext")
            .field("query_text", &self.query_text)
            .field("query_id", &self.query_id)
            .field("backend", &self.backend)
            .field("filter", &self.filter)
            .finish()
    }
}

/// A stage that maps a ranked list to a new ranked list.
///
/// `rerank` is infallible: a reranker that cannot do its work returns its
/// input unchanged, so a cascade always produces a ranking.
pub trait Reranker: Send + Sync {
    /// Rerank `docs` for the query described by `context`.
    fn rerank(&self, docs: ScoredDocuments, context: &RerankerContext) -> ScoredDocuments;

    /// Short name for logging.
    fn name(&self) -> &str;
}

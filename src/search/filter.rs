//! Result-set filters applied by backends during query execution.

use std::collections::HashSet;
use std::fmt::Debug;

/// Restricts which documents a search may return.
///
/// The reranker passes the filter from the first retrieval pass through to
/// the expanded search unchanged.
pub trait DocFilter: Send + Sync + Debug {
    /// Whether `doc_id` may appear in results.
    fn accept(&self, doc_id: u64) -> bool;
}

/// Accepts only an explicit set of document ids.
#[derive(Debug, Clone, Default)]
pub struct DocIdFilter {
    allowed: HashSet<u64>,
}

impl DocIdFilter {
    /// Create a filter accepting exactly `ids`.
    pub fn new<I: IntoIterator<Item = u64>>(ids: I) -> Self {
        DocIdFilter {
            allowed: ids.into_iter().collect(),
        }
    }

    /// Number of accepted ids.
    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    /// Whether the filter accepts nothing.
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

impl DocFilter for DocIdFilter {
    fn accept(&self, doc_id: u64) -> bool {
        self.allowed.contains(&doc_id)
    }
}

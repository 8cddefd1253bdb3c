//! Search backend interface.
//!
//! The expansion core never owns an index. Everything it needs from one
//! (term vectors of feedback documents, parsing and executing the expanded
//! query) goes through [`SearchBackend`]. [`MemoryBackend`] is a small
//! in-memory implementation for tests, demos, and the CLI.

pub mod backend;
pub mod filter;
pub mod memory;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

pub use self::backend::SearchBackend;
pub use self::filter::{DocFilter, DocIdFilter};
pub use self::memory::MemoryBackend;

/// A document's term frequencies for one field.
pub type TermFrequencies = AHashMap<String, u64>;

/// A search hit: document id and retrieval score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// The document ID.
    pub doc_id: u64,
    /// The relevance score.
    pub score: f32,
}

impl SearchHit {
    /// Create a new search hit.
    pub fn new(doc_id: u64, score: f32) -> Self {
        SearchHit { doc_id, score }
    }
}

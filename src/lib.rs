//! # rm3
//!
//! RM3 pseudo-relevance feedback for Rust.
//!
//! Given a first-pass ranking and the query text, RM3 estimates a term
//! distribution from the top documents, mixes it with the query's own
//! distribution, and searches again with the weighted expansion.
//!
//! ## Features
//!
//! - Sparse term-weight vectors with pruning and interpolation
//! - Relevance model estimation over backend term vectors
//! - Fail-open reranking: any error returns the original ranking
//! - Composable rerankers and parallel batch reranking
//! - Pluggable search backends, with a BM25 in-memory backend included

pub mod analysis;
pub mod cli;
pub mod error;
pub mod feature_vector;
pub mod query;
pub mod rerank;
pub mod rm3;
pub mod search;

pub mod prelude {
    pub use crate::analysis::analyzer::{Analyzer, StandardAnalyzer, WhitespaceAnalyzer};
    pub use crate::error::{Result, Rm3Error};
    pub use crate::feature_vector::FeatureVector;
    pub use crate::query::{BooleanQuery, Query, QueryParser, TermQuery};
    pub use crate::rerank::{
        IdentityReranker, Reranker, RerankerCascade, RerankerContext, ScoredDocuments,
        rerank_batch,
    };
    pub use crate::rm3::{RelevanceModelEstimator, Rm3Config, Rm3Reranker, Stopper};
    pub use crate::search::{DocFilter, DocIdFilter, MemoryBackend, SearchBackend, SearchHit};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

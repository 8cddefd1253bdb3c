//! Relevance Model 3 (RM3) pseudo-relevance feedback.
//!
//! RM3 assumes the top documents of a first retrieval pass are relevant,
//! estimates a term distribution from them, mixes it with the original
//! query's distribution, and searches again with the mixture.
//!
//! # Architecture
//!
//! - [`Stopper`]: terms never admitted into feedback vectors
//! - [`Rm3Config`]: immutable reranker settings
//! - [`RelevanceModelEstimator`]: score-weighted aggregation of feedback documents
//! - [`Rm3Reranker`]: the full expand-and-search cycle as a [`Reranker`](crate::rerank::Reranker)
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use rm3::analysis::analyzer::StandardAnalyzer;
//! use rm3::rerank::{Reranker, RerankerContext, ScoredDocuments};
//! use rm3::rm3::{Rm3Config, Rm3Reranker};
//! use rm3::search::MemoryBackend;
//!
//! # fn main() -> rm3::error::Result<()> {
//! let analyzer = Arc::new(StandardAnalyzer::new());
//! let backend = Arc::new(MemoryBackend::new(analyzer.clone()));
//! backend.add_text(1, "contents", "the cat sat on the mat")?;
//! backend.add_text(2, "contents", "a dog chased the cat")?;
//!
//! let reranker = Rm3Reranker::new(analyzer, Rm3Config::default())?;
//! let context = RerankerContext::new("cat", backend);
//! let initial = ScoredDocuments::new(vec![1, 2], vec![1.2, 0.8]);
//!
//! let reranked = reranker.rerank(initial, &context);
//! assert_eq!(reranked.len(), 2);
//! # Ok(())
//! # }
//! ```

mod config;
mod estimator;
mod reranker;
mod stopper;

pub use config::{DEFAULT_FB_DOCS, DEFAULT_FB_TERMS, DEFAULT_ORIGINAL_QUERY_WEIGHT, Rm3Config};
pub use estimator::RelevanceModelEstimator;
pub use reranker::{MAX_RESULTS, Rm3Reranker, Stage};
pub use stopper::Stopper;

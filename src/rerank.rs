//! Reranking capability and composition.
//!
//! A [`Reranker`] takes a ranked list and returns a new one. Rerankers are
//! stateless per call, so one instance can serve many queries at once, and
//! they compose sequentially in a [`RerankerCascade`].

pub mod batch;
pub mod cascade;
pub mod reranker;
pub mod scored_documents;

pub use self::batch::rerank_batch;
pub use self::cascade::{IdentityReranker, RerankerCascade};
pub use self::reranker::{Reranker, RerankerContext};
pub use self::scored_documents::ScoredDocuments;

//! Analyzers: a tokenizer plus a chain of filters.
//!
//! - [`StandardAnalyzer`] - Unicode words, lowercased, optional stopwords
//! - [`WhitespaceAnalyzer`] - whitespace split, no normalization
//! - [`PipelineAnalyzer`] - any tokenizer with any filter chain

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// The trait requires `Send + Sync` so one analyzer can be shared by
/// rerankers running on several threads.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod pipeline;
pub mod standard;
pub mod whitespace;

pub use pipeline::PipelineAnalyzer;
pub use standard::StandardAnalyzer;
pub use whitespace::WhitespaceAnalyzer;

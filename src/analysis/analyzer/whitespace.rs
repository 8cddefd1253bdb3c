//! Whitespace analyzer: whitespace split with no normalization.
//!
//! Expanded RM3 queries are parsed with this analyzer's tokenization; the
//! terms in them were produced by the backend's own analysis already.

use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::tokenizer::Tokenizer;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::error::Result;

/// An analyzer that only splits on whitespace.
#[derive(Clone)]
pub struct WhitespaceAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
}

impl WhitespaceAnalyzer {
    /// Create a new whitespace analyzer.
    pub fn new() -> Self {
        WhitespaceAnalyzer {
            tokenizer: Arc::new(WhitespaceTokenizer::new()),
        }
    }
}

impl Default for WhitespaceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for WhitespaceAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.tokenizer.tokenize(text)
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}

impl std::fmt::Debug for WhitespaceAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhitespaceAnalyzer")
            .field("tokenizer", &self.tokenizer.name())
            .finish()
    }
}

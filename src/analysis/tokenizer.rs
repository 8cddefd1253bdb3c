//! Tokenizers split raw text into tokens.
//!
//! - [`whitespace::WhitespaceTokenizer`] - splits on whitespace only; used to
//!   read back already-atomic expanded query terms
//! - [`unicode_word::UnicodeWordTokenizer`] - Unicode word boundaries (UAX #29)

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod unicode_word;
pub mod whitespace;

pub use unicode_word::UnicodeWordTokenizer;
pub use whitespace::WhitespaceTokenizer;

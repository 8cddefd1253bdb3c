//! Lowercase filter implementation.
//!
//! ```
//! use rm3::analysis::token_filter::Filter;
//! use rm3::analysis::token_filter::lowercase::LowercaseFilter;
//! use rm3::analysis::token::Token;
//!
//! let filter = LowercaseFilter::new();
//! let tokens = vec![Token::new("Hello", 0), Token::new("WORLD", 1)];
//! let filtered: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(filtered[0].text, "hello");
//! assert_eq!(filtered[1].text, "world");
//! ```

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// A filter that converts tokens to lowercase.
///
/// Stopped tokens pass through untouched. ASCII text takes the cheap
/// `to_ascii_lowercase` path, everything else uses Unicode lowercasing.
#[derive(Clone, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    /// Create a new lowercase filter.
    pub fn new() -> Self {
        LowercaseFilter
    }
}

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.map(|token| {
            if token.is_stopped() {
                token
            } else if token.text.is_ascii() {
                let lowered = token.text.to_ascii_lowercase();
                token.with_text(lowered)
            } else {
                let lowered = token.text.to_lowercase();
                token.with_text(lowered)
            }
        })))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}

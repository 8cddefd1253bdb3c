//! Whitespace tokenizer.
//!
//! Splits on Unicode whitespace and nothing else, so `cat^0.25` stays one
//! token. This is the tokenization the expanded-query parser relies on.
//!
//! ```
//! use rm3::analysis::tokenizer::Tokenizer;
//! use rm3::analysis::tokenizer::whitespace::WhitespaceTokenizer;
//!
//! let tokens: Vec<_> = WhitespaceTokenizer::new()
//!     .tokenize("cat^0.5  dog^0.25")
//!     .unwrap()
//!     .collect();
//! assert_eq!(tokens.len(), 2);
//! assert_eq!(tokens[1].text, "dog^0.25");
//! ```

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// A tokenizer that splits text on whitespace.
#[derive(Clone, Debug, Default)]
pub struct WhitespaceTokenizer;

impl WhitespaceTokenizer {
    /// Create a new whitespace tokenizer.
    pub fn new() -> Self {
        WhitespaceTokenizer
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = Vec::new();
        let mut start: Option<usize> = None;

        for (offset, c) in text.char_indices() {
            match (c.is_whitespace(), start) {
                (true, Some(begin)) => {
                    tokens.push(Token::with_offsets(
                        &text[begin..offset],
                        tokens.len(),
                        begin,
                        offset,
                    ));
                    start = None;
                }
                (false, None) => start = Some(offset),
                _ => {}
            }
        }

        if let Some(begin) = start {
            tokens.push(Token::with_offsets(
                &text[begin..],
                tokens.len(),
                begin,
                text.len(),
            ));
        }

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}

//! Stop filter implementation.
//!
//! Marks tokens whose text is a stopword as stopped (or drops them, when
//! configured to). The word list is a shared [`Stopper`], so query analysis
//! and feedback-document filtering can use one list.
//!
//! ```
//! use std::sync::Arc;
//!
//! use rm3::analysis::token::Token;
//! use rm3::analysis::token_filter::Filter;
//! use rm3::analysis::token_filter::stop::StopFilter;
//! use rm3::rm3::Stopper;
//!
//! let filter = StopFilter::new(Arc::new(Stopper::english())).remove_stopped(true);
//! let tokens = vec![Token::new("the", 0), Token::new("quick", 1)];
//!
//! let result: Vec<_> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();
//! assert_eq!(result.len(), 1);
//! assert_eq!(result[0].text, "quick");
//! ```

use std::sync::Arc;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;
use crate::rm3::Stopper;

/// A filter that removes or marks stop words in the token stream.
#[derive(Clone, Debug)]
pub struct StopFilter {
    stopper: Arc<Stopper>,
    remove_stopped: bool,
}

impl StopFilter {
    /// Create a stop filter backed by `stopper`. Stopwords are marked, not removed.
    pub fn new(stopper: Arc<Stopper>) -> Self {
        StopFilter {
            stopper,
            remove_stopped: false,
        }
    }

    /// Drop stopped tokens from the stream instead of marking them.
    pub fn remove_stopped(mut self, remove: bool) -> Self {
        self.remove_stopped = remove;
        self
    }

    /// Get the underlying stopper.
    pub fn stopper(&self) -> &Arc<Stopper> {
        &self.stopper
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let stopper = Arc::clone(&self.stopper);
        let marked = tokens.map(move |token| {
            if stopper.is_stopword(&token.text) {
                token.stop()
            } else {
                token
            }
        });

        if self.remove_stopped {
            Ok(Box::new(marked.filter(|token| !token.is_stopped())))
        } else {
            Ok(Box::new(marked))
        }
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}

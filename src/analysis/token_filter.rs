//! Token filters transform token streams produced by tokenizers.
//!
//! - [`lowercase::LowercaseFilter`] - converts tokens to lowercase
//! - [`stop::StopFilter`] - marks tokens found in a [`Stopper`](crate::rm3::Stopper) as stopped

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod lowercase;
pub mod stop;

pub use lowercase::LowercaseFilter;
pub use stop::StopFilter;

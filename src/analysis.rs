//! Text analysis used to turn query text into terms.
//!
//! The expansion core never analyzes document text itself: document terms
//! come pre-analyzed from the search backend's term vectors. Query text does
//! need analysis, and the analyzer used here must match the one the backend
//! indexed the field with, otherwise the original-query vector and the
//! feedback vectors speak different vocabularies.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

use crate::analysis::analyzer::Analyzer;
use crate::error::Result;

/// Analyze `text` and collect the surviving token texts in order.
///
/// Tokens marked as stopped by a filter are dropped.
///
/// ```
/// use rm3::analysis::analyzer::StandardAnalyzer;
/// use rm3::analysis::tokenize;
///
/// let analyzer = StandardAnalyzer::new();
/// assert_eq!(tokenize(&analyzer, "Cats, cats!").unwrap(), vec!["cats", "cats"]);
/// ```
pub fn tokenize(analyzer: &dyn Analyzer, text: &str) -> Result<Vec<String>> {
    Ok(analyzer
        .analyze(text)?
        .filter(|token| !token.is_stopped())
        .map(|token| token.text)
        .collect())
}

//! Stopword admission filter for feedback term vectors.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::Result;

/// Default English stop words list.
const DEFAULT_ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// Default English stop words as a HashSet.
pub static DEFAULT_ENGLISH_STOP_WORDS_SET: LazyLock<HashSet<String>> = LazyLock::new(|| {
    DEFAULT_ENGLISH_STOP_WORDS
        .iter()
        .map(|&s| s.to_string())
        .collect()
});

/// An immutable set of words excluded from feedback vectors.
///
/// An empty stopper stops nothing. Share one instance through `Arc`; there
/// is no way to change the word list after construction.
///
/// ```
/// use rm3::rm3::Stopper;
///
/// let stopper = Stopper::new(["the", "of"]);
/// assert!(stopper.is_stopword("the"));
/// assert!(!stopper.is_stopword("cat"));
/// assert!(!Stopper::empty().is_stopword("the"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stopper {
    words: HashSet<String>,
}

impl Stopper {
    /// Create a stopper from a word list.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Stopper {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// A stopper that stops nothing.
    pub fn empty() -> Self {
        Stopper {
            words: HashSet::new(),
        }
    }

    /// The stock English list.
    pub fn english() -> Self {
        Stopper {
            words: DEFAULT_ENGLISH_STOP_WORDS_SET.clone(),
        }
    }

    /// Load one stopword per line. Lines are trimmed; blank lines and lines
    /// starting with `#` are skipped. An empty path gives the empty stopper.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Ok(Stopper::empty());
        }

        let content = fs::read_to_string(path)?;
        let stopper = Stopper::new(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        );
        log::debug!(
            "loaded {} stopwords from {}",
            stopper.len(),
            path.display()
        );
        Ok(stopper)
    }

    /// Merge another word list into a new stopper.
    pub fn union(&self, other: &Stopper) -> Stopper {
        Stopper {
            words: self.words.union(&other.words).cloned().collect(),
        }
    }

    /// Whether `term` is on the list.
    pub fn is_stopword(&self, term: &str) -> bool {
        self.words.contains(term)
    }

    /// Number of words on the list.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

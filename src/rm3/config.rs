//! Reranker settings.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, Rm3Error};
use crate::rm3::Stopper;

/// Default number of expansion terms kept in the relevance model.
pub const DEFAULT_FB_TERMS: usize = 20;
/// Default number of top documents used as feedback.
pub const DEFAULT_FB_DOCS: usize = 50;
/// Default weight of the original query in the interpolation.
pub const DEFAULT_ORIGINAL_QUERY_WEIGHT: f32 = 0.5;
/// Default field term vectors are read from and the expanded query targets.
pub const DEFAULT_FIELD: &str = "contents";

fn default_fb_terms() -> usize {
    DEFAULT_FB_TERMS
}

fn default_fb_docs() -> usize {
    DEFAULT_FB_DOCS
}

fn default_original_query_weight() -> f32 {
    DEFAULT_ORIGINAL_QUERY_WEIGHT
}

fn default_field() -> String {
    DEFAULT_FIELD.to_string()
}

fn default_max_results() -> usize {
    super::MAX_RESULTS
}

/// Configuration for [`Rm3Reranker`](super::Rm3Reranker).
///
/// Missing keys take their defaults when deserializing, so a config file
/// only needs the settings it changes:
///
/// ```
/// use rm3::rm3::Rm3Config;
///
/// let config: Rm3Config = serde_json::from_str(r#"{"fb_terms": 10}"#).unwrap();
/// assert_eq!(config.fb_terms, 10);
/// assert_eq!(config.fb_docs, 50);
/// assert_eq!(config.field, "contents");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rm3Config {
    /// Number of terms kept in the relevance model.
    #[serde(default = "default_fb_terms")]
    pub fb_terms: usize,

    /// Number of top-ranked documents treated as relevant.
    #[serde(default = "default_fb_docs")]
    pub fb_docs: usize,

    /// Weight of the original query; `1 - weight` goes to the model.
    #[serde(default = "default_original_query_weight")]
    pub original_query_weight: f32,

    /// Field to read term vectors from and search in.
    #[serde(default = "default_field")]
    pub field: String,

    /// Inline stopwords.
    #[serde(default)]
    pub stopwords: Vec<String>,

    /// File with one stopword per line, merged with `stopwords`.
    #[serde(default)]
    pub stopword_file: Option<PathBuf>,

    /// Maximum number of hits requested from the expanded search.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for Rm3Config {
    fn default() -> Self {
        Rm3Config {
            fb_terms: DEFAULT_FB_TERMS,
            fb_docs: DEFAULT_FB_DOCS,
            original_query_weight: DEFAULT_ORIGINAL_QUERY_WEIGHT,
            field: default_field(),
            stopwords: Vec::new(),
            stopword_file: None,
            max_results: default_max_results(),
        }
    }
}

impl Rm3Config {
    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: Rm3Config = serde_json::from_str(&content)?;
        debug!("Loaded RM3 configuration from {}", path.display());
        Ok(config)
    }

    pub fn with_fb_terms(mut self, fb_terms: usize) -> Self {
        self.fb_terms = fb_terms;
        self
    }

    pub fn with_fb_docs(mut self, fb_docs: usize) -> Self {
        self.fb_docs = fb_docs;
        self
    }

    pub fn with_original_query_weight(mut self, weight: f32) -> Self {
        self.original_query_weight = weight;
        self
    }

    pub fn with_field<S: Into<String>>(mut self, field: S) -> Self {
        self.field = field.into();
        self
    }

    pub fn with_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stopwords = words.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_stopword_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.stopword_file = Some(path.into());
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Check that every setting is usable.
    pub fn validate(&self) -> Result<()> {
        if self.fb_terms == 0 {
            return Err(Rm3Error::invalid_config("fb_terms must be positive"));
        }
        if self.fb_docs == 0 {
            return Err(Rm3Error::invalid_config("fb_docs must be positive"));
        }
        if !(0.0..=1.0).contains(&self.original_query_weight) {
            return Err(Rm3Error::invalid_config(format!(
                "original_query_weight must be within [0, 1], got {}",
                self.original_query_weight
            )));
        }
        if self.field.is_empty() {
            return Err(Rm3Error::invalid_config("field must not be empty"));
        }
        if self.max_results == 0 {
            return Err(Rm3Error::invalid_config("max_results must be positive"));
        }
        Ok(())
    }

    /// Resolve the stopper from the inline list and the optional file.
    pub fn build_stopper(&self) -> Result<Stopper> {
        let inline = Stopper::new(self.stopwords.iter().cloned());
        match &self.stopword_file {
            Some(path) => Ok(inline.union(&Stopper::from_file(path)?)),
            None => Ok(inline),
        }
    }
}

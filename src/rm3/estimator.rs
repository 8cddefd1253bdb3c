//! Relevance model estimation from feedback documents.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::debug;

use crate::error::Result;
use crate::feature_vector::FeatureVector;
use crate::rerank::ScoredDocuments;
use crate::rm3::{Rm3Config, Stopper};
use crate::search::SearchBackend;

/// Estimates a term distribution from the top-ranked documents.
///
/// For every term `t` in the feedback vocabulary:
///
/// ```text
/// weight(t) = sum over feedback docs i of (tf_i(t) / ||doc_i||_2) * score_i
/// ```
///
/// The result is pruned to `fb_terms` terms and normalized to sum to one.
/// Retrieval scores are used as given.
#[derive(Debug, Clone)]
pub struct RelevanceModelEstimator {
    fb_docs: usize,
    fb_terms: usize,
    field: String,
    stopper: Arc<Stopper>,
}

impl RelevanceModelEstimator {
    pub fn new<S: Into<String>>(
        fb_docs: usize,
        fb_terms: usize,
        field: S,
        stopper: Arc<Stopper>,
    ) -> Self {
        RelevanceModelEstimator {
            fb_docs,
            fb_terms,
            field: field.into(),
            stopper,
        }
    }

    /// Build an estimator from a validated configuration.
    pub fn from_config(config: &Rm3Config, stopper: Arc<Stopper>) -> Self {
        Self::new(config.fb_docs, config.fb_terms, config.field.clone(), stopper)
    }

    pub fn fb_docs(&self) -> usize {
        self.fb_docs
    }

    pub fn fb_terms(&self) -> usize {
        self.fb_terms
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn stopper(&self) -> &Arc<Stopper> {
        &self.stopper
    }

    /// Estimate the relevance model from the first `fb_docs` entries of `docs`.
    ///
    /// Fails if any feedback document's term vector cannot be fetched.
    ///
    /// # Panics
    ///
    /// Panics if `docs.ids` and `docs.scores` differ in length.
    pub fn estimate(
        &self,
        docs: &ScoredDocuments,
        backend: &dyn SearchBackend,
    ) -> Result<FeatureVector> {
        assert_eq!(
            docs.ids.len(),
            docs.scores.len(),
            "document ids and scores must have the same length"
        );

        let num_docs = docs.len().min(self.fb_docs);

        let mut doc_vectors = Vec::with_capacity(num_docs);
        let mut vocab = BTreeSet::new();
        for (doc_id, score) in docs.iter().take(num_docs) {
            let term_freqs = backend.term_vector(doc_id, &self.field)?;
            let vector = FeatureVector::from_term_vector(&term_freqs, &self.stopper);
            vocab.extend(vector.features().map(str::to_string));

            let norm = vector.compute_l2_norm();
            doc_vectors.push((vector, norm, score as f64));
        }

        let mut model = FeatureVector::new();
        for term in &vocab {
            let weight: f64 = doc_vectors
                .iter()
                .filter(|(_, norm, _)| *norm > 0.0)
                .map(|(vector, norm, score)| vector.feature_weight(term) as f64 / norm * score)
                .sum();
            model.set_feature_weight(term.as_str(), weight as f32);
        }

        model.prune_to_size(self.fb_terms).normalize();

        debug!(
            "estimated relevance model: {} feedback docs, {} vocabulary terms, {} kept",
            num_docs,
            vocab.len(),
            model.len()
        );

        Ok(model)
    }
}

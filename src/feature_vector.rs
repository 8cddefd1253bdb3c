//! Sparse term-weight vectors.
//!
//! A [`FeatureVector`] maps terms to non-negative weights. It is the unit of
//! representation for queries, feedback documents, and the estimated
//! relevance model alike.
//!
//! # Examples
//!
//! ```
//! use rm3::feature_vector::FeatureVector;
//!
//! let query = FeatureVector::from_terms(["cat", "cat", "dog"]).normalized();
//! assert!((query.feature_weight("cat") - 2.0 / 3.0).abs() < 1e-6);
//! assert_eq!(query.feature_weight("bird"), 0.0);
//!
//! let mut model = FeatureVector::new();
//! model.add_feature_weight("bird", 1.0);
//!
//! let expanded = FeatureVector::interpolate(&query, &model, 0.5);
//! assert_eq!(expanded.len(), 3);
//! assert_eq!(expanded.to_query_string(), "bird^0.5 cat^0.33333334 dog^0.16666667");
//! ```

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::rm3::Stopper;
use crate::search::TermFrequencies;

/// Sparse mapping from term to weight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    features: AHashMap<String, f32>,
}

impl FeatureVector {
    /// Create an empty vector.
    pub fn new() -> Self {
        FeatureVector {
            features: AHashMap::new(),
        }
    }

    /// Build a vector whose weights are raw token frequencies.
    pub fn from_terms<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vector = FeatureVector::new();
        for token in tokens {
            vector.add_feature_weight(token.as_ref(), 1.0);
        }
        vector
    }

    /// Build a vector from a document's term frequencies, skipping stopwords.
    ///
    /// Fetching the term frequencies is the backend's job and the only
    /// fallible step; by the time a map exists this cannot fail.
    pub fn from_term_vector(term_freqs: &TermFrequencies, stopper: &Stopper) -> Self {
        let mut vector = FeatureVector::new();
        for (term, &freq) in term_freqs {
            if freq == 0 || stopper.is_stopword(term) {
                continue;
            }
            vector.add_feature_weight(term, freq as f32);
        }
        vector
    }

    /// Scale all weights so they sum to 1.0.
    ///
    /// A vector whose weights sum to zero is left untouched.
    pub fn normalize(&mut self) -> &mut Self {
        let total = self.total_weight();
        if total > 0.0 {
            for weight in self.features.values_mut() {
                *weight = (*weight as f64 / total) as f32;
            }
        }
        self
    }

    /// Consuming form of [`normalize`](Self::normalize), for chaining.
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Euclidean norm of the weights. The vector itself is not modified.
    pub fn compute_l2_norm(&self) -> f64 {
        self.features
            .values()
            .map(|&w| (w as f64) * (w as f64))
            .sum::<f64>()
            .sqrt()
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> f64 {
        self.features.values().map(|&w| w as f64).sum()
    }

    /// Weight of `term`, or 0.0 when absent.
    pub fn feature_weight(&self, term: &str) -> f32 {
        self.features.get(term).copied().unwrap_or(0.0)
    }

    /// Add `delta` to the weight of `term`, creating the entry if absent.
    pub fn add_feature_weight(&mut self, term: &str, delta: f32) {
        match self.features.get_mut(term) {
            Some(weight) => *weight += delta,
            None => {
                self.features.insert(term.to_string(), delta);
            }
        }
    }

    /// Overwrite the weight of `term`.
    pub fn set_feature_weight<S: Into<String>>(&mut self, term: S, weight: f32) {
        self.features.insert(term.into(), weight);
    }

    /// Keep only the `k` highest-weighted terms.
    ///
    /// Ties are broken by ascending term so the survivors do not depend on
    /// hash order. A vector with at most `k` terms is left alone.
    pub fn prune_to_size(&mut self, k: usize) -> &mut Self {
        if self.features.len() <= k {
            return self;
        }

        let mut ordered = self.ordered();
        ordered.truncate(k);
        self.features = ordered.into_iter().collect();
        self
    }

    /// Linear interpolation over the union of both vectors' terms:
    /// `weight_of_a * a[t] + (1 - weight_of_a) * b[t]`.
    pub fn interpolate(a: &FeatureVector, b: &FeatureVector, weight_of_a: f32) -> FeatureVector {
        let vocab: BTreeSet<&str> = a.features().chain(b.features()).collect();

        let mut result = FeatureVector::new();
        for term in vocab {
            let weight =
                weight_of_a * a.feature_weight(term) + (1.0 - weight_of_a) * b.feature_weight(term);
            result.set_feature_weight(term, weight);
        }
        result
    }

    /// Terms present in the vector, in no particular order.
    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    /// `(term, weight)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.features.iter().map(|(term, &weight)| (term.as_str(), weight))
    }

    /// `(term, weight)` pairs sorted by weight descending, then term ascending.
    pub fn ordered(&self) -> Vec<(String, f32)> {
        let mut entries: Vec<(String, f32)> = self
            .features
            .iter()
            .map(|(term, &weight)| (term.clone(), weight))
            .collect();
        entries.sort_by(|(ta, wa), (tb, wb)| {
            wb.partial_cmp(wa)
                .unwrap_or(Ordering::Equal)
                .then_with(|| ta.cmp(tb))
        });
        entries
    }

    /// Serialize as space-separated `term^weight` entries in [`ordered`](Self::ordered) order.
    pub fn to_query_string(&self) -> String {
        self.ordered()
            .iter()
            .map(|(term, weight)| format!("{term}^{weight}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the vector has no terms.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Whether `term` has an entry (possibly with zero weight).
    pub fn contains(&self, term: &str) -> bool {
        self.features.contains_key(term)
    }
}

impl FromIterator<(String, f32)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (String, f32)>>(iter: I) -> Self {
        FeatureVector {
            features: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (term, weight)) in self.ordered().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{weight:.6}\t{term}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_from_terms_counts_frequencies() {
        let vector = FeatureVector::from_terms(["a", "b", "a", "c", "a"]);
        assert_eq!(vector.len(), 3);
        assert_eq!(vector.feature_weight("a"), 3.0);
        assert_eq!(vector.feature_weight("b"), 1.0);
        assert_eq!(vector.feature_weight("missing"), 0.0);
    }

    #[test]
    fn test_normalize_sums_to_one() {
        let vector = FeatureVector::from_terms(["x", "y", "y", "z", "z", "z"]).normalized();
        assert!(approx_eq(vector.total_weight(), 1.0));
        assert!(approx_eq(vector.feature_weight("z") as f64, 0.5));
    }

    #[test]
    fn test_normalize_zero_vector_stays_zero() {
        let mut vector = FeatureVector::new();
        vector.set_feature_weight("a", 0.0);
        vector.set_feature_weight("b", 0.0);
        vector.normalize();

        assert_eq!(vector.feature_weight("a"), 0.0);
        assert!(vector.iter().all(|(_, w)| w.is_finite()));

        let mut empty = FeatureVector::new();
        empty.normalize();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_l2_norm_does_not_modify_vector() {
        let mut vector = FeatureVector::new();
        vector.set_feature_weight("a", 3.0);
        vector.set_feature_weight("b", 4.0);

        assert!(approx_eq(vector.compute_l2_norm(), 5.0));
        assert_eq!(vector.feature_weight("a"), 3.0);
    }

    #[test]
    fn test_add_feature_weight_accumulates() {
        let mut vector = FeatureVector::new();
        vector.add_feature_weight("a", 0.25);
        vector.add_feature_weight("a", 0.5);
        assert_eq!(vector.feature_weight("a"), 0.75);
        assert!(vector.contains("a"));
    }

    #[test]
    fn test_from_term_vector_skips_stopwords() {
        let mut freqs = TermFrequencies::new();
        freqs.insert("the".to_string(), 7);
        freqs.insert("cat".to_string(), 2);
        freqs.insert("ghost".to_string(), 0);

        let vector = FeatureVector::from_term_vector(&freqs, &Stopper::new(["the"]));
        assert_eq!(vector.len(), 1);
        assert_eq!(vector.feature_weight("cat"), 2.0);
    }

    #[test]
    fn test_prune_keeps_heaviest_terms() {
        let mut vector = FeatureVector::new();
        for (term, weight) in [("a", 0.1), ("b", 0.9), ("c", 0.5), ("d", 0.7), ("e", 0.2)] {
            vector.set_feature_weight(term, weight);
        }

        vector.prune_to_size(3);

        assert_eq!(vector.len(), 3);
        let kept_min = vector.iter().map(|(_, w)| w).fold(f32::INFINITY, f32::min);
        assert!(kept_min >= 0.5);
        assert!(vector.contains("b") && vector.contains("c") && vector.contains("d"));
    }

    #[test]
    fn test_prune_breaks_ties_by_term() {
        let mut vector = FeatureVector::new();
        for term in ["delta", "alpha", "charlie", "bravo"] {
            vector.set_feature_weight(term, 1.0);
        }

        vector.prune_to_size(2);

        let mut kept: Vec<&str> = vector.features().collect();
        kept.sort();
        assert_eq!(kept, vec!["alpha", "bravo"]);
    }

    #[test]
    fn test_prune_noop_when_small() {
        let mut vector = FeatureVector::from_terms(["a", "b"]);
        vector.prune_to_size(5);
        assert_eq!(vector.len(), 2);
        vector.prune_to_size(2);
        assert_eq!(vector.len(), 2);
    }

    #[test]
    fn test_interpolate_endpoints() {
        let a = FeatureVector::from_terms(["cat", "dog", "dog"]).normalized();
        let b = FeatureVector::from_terms(["bird", "cat"]).normalized();

        let only_a = FeatureVector::interpolate(&a, &b, 1.0);
        let only_b = FeatureVector::interpolate(&a, &b, 0.0);

        assert_eq!(only_a.len(), 3);
        assert_eq!(only_b.len(), 3);
        for term in ["cat", "dog", "bird"] {
            assert_eq!(only_a.feature_weight(term), a.feature_weight(term));
            assert_eq!(only_b.feature_weight(term), b.feature_weight(term));
        }
    }

    #[test]
    fn test_interpolate_midpoint() {
        let a = FeatureVector::from_terms(["cat"]);
        let b = FeatureVector::from_terms(["dog"]);

        let mixed = FeatureVector::interpolate(&a, &b, 0.25);
        assert!(approx_eq(mixed.feature_weight("cat") as f64, 0.25));
        assert!(approx_eq(mixed.feature_weight("dog") as f64, 0.75));
    }

    #[test]
    fn test_ordered_and_query_string() {
        let mut vector = FeatureVector::new();
        vector.set_feature_weight("b", 0.25);
        vector.set_feature_weight("a", 0.25);
        vector.set_feature_weight("c", 0.5);

        let ordered: Vec<String> = vector.ordered().into_iter().map(|(t, _)| t).collect();
        assert_eq!(ordered, vec!["c", "a", "b"]);
        assert_eq!(vector.to_query_string(), "c^0.5 a^0.25 b^0.25");
        assert_eq!(FeatureVector::new().to_query_string(), "");
    }

    #[test]
    fn test_display_lists_weights() {
        let vector = FeatureVector::from_terms(["cat", "cat", "dog"]).normalized();
        let rendered = vector.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("\tcat"));
    }
}

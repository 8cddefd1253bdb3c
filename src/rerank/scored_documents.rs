//! Ranked candidate lists.

use serde::{Deserialize, Serialize};

use crate::search::SearchHit;

/// A ranked list of documents: parallel id and score sequences.
///
/// `ids[i]` is paired with `scores[i]`. The lists are expected to have equal
/// length; consumers treat a mismatch as a programming error and panic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocuments {
    /// Document ids, best first.
    pub ids: Vec<u64>,
    /// Retrieval scores aligned with `ids`.
    pub scores: Vec<f32>,
}

impl ScoredDocuments {
    pub fn new(ids: Vec<u64>, scores: Vec<f32>) -> Self {
        ScoredDocuments { ids, scores }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap backend hits, keeping their order.
    pub fn from_hits<I: IntoIterator<Item = SearchHit>>(hits: I) -> Self {
        let (ids, scores) = hits.into_iter().map(|hit| (hit.doc_id, hit.score)).unzip();
        ScoredDocuments { ids, scores }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate over `(id, score)` pairs. Stops at the shorter list.
    pub fn iter(&self) -> impl Iterator<Item = (u64, f32)> + '_ {
        self.ids.iter().copied().zip(self.scores.iter().copied())
    }

    /// The list as backend hits.
    pub fn hits(&self) -> Vec<SearchHit> {
        self.iter()
            .map(|(doc_id, score)| SearchHit::new(doc_id, score))
            .collect()
    }

    /// Keep only the first `len` entries.
    pub fn truncate(&mut self, len: usize) {
        self.ids.truncate(len);
        self.scores.truncate(len);
    }
}

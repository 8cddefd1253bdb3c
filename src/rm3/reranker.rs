//! The RM3 expand-and-search reranker.

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};

use crate::analysis::analyzer::Analyzer;
use crate::analysis::tokenize;
use crate::error::{Result, Rm3Error};
use crate::feature_vector::FeatureVector;
use crate::rerank::{Reranker, RerankerContext, ScoredDocuments};
use crate::rm3::{RelevanceModelEstimator, Rm3Config};

/// Maximum number of hits requested from the expanded search by default.
pub const MAX_RESULTS: usize = 1000;

/// Steps of one reranking cycle, in execution order.
///
/// `Done` and `FailedPassthrough` are terminal. Only `Analyze`, `Estimate`,
/// `Parse` and `Search` can fail; a failure ends the cycle in
/// `FailedPassthrough` with the input ranking returned unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Analyze,
    Estimate,
    Interpolate,
    Serialize,
    Parse,
    Search,
    Done,
    FailedPassthrough,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Analyze => "analyze",
            Stage::Estimate => "estimate",
            Stage::Interpolate => "interpolate",
            Stage::Serialize => "serialize",
            Stage::Parse => "parse",
            Stage::Search => "search",
            Stage::Done => "done",
            Stage::FailedPassthrough => "failed-passthrough",
        };
        f.write_str(name)
    }
}

/// An error tagged with the stage it happened in.
struct StageError {
    stage: Stage,
    error: Rm3Error,
}

trait AtStage<T> {
    fn at(self, stage: Stage) -> std::result::Result<T, StageError>;
}

impl<T> AtStage<T> for Result<T> {
    fn at(self, stage: Stage) -> std::result::Result<T, StageError> {
        self.map_err(|error| StageError { stage, error })
    }
}

/// Pseudo-relevance feedback reranker.
///
/// Treats the top `fb_docs` documents of the input ranking as relevant,
/// estimates a relevance model from their term vectors, interpolates it
/// with the analyzed query, and re-searches the backend with the result.
/// Any failure along the way returns the input ranking unchanged.
///
/// The analyzer must be the one the backend indexed `field` with.
pub struct Rm3Reranker {
    analyzer: Arc<dyn Analyzer>,
    config: Rm3Config,
    estimator: RelevanceModelEstimator,
}

impl Rm3Reranker {
    /// Validate `config`, resolve its stopwords, and build the reranker.
    pub fn new(analyzer: Arc<dyn Analyzer>, config: Rm3Config) -> Result<Self> {
        config.validate()?;
        let stopper = Arc::new(config.build_stopper()?);
        let estimator = RelevanceModelEstimator::from_config(&config, stopper);

        Ok(Rm3Reranker {
            analyzer,
            config,
            estimator,
        })
    }

    pub fn config(&self) -> &Rm3Config {
        &self.config
    }

    pub fn estimator(&self) -> &RelevanceModelEstimator {
        &self.estimator
    }

    /// Compute the interpolated query vector without searching.
    ///
    /// # Panics
    ///
    /// Panics if `docs.ids` and `docs.scores` differ in length.
    pub fn expand(
        &self,
        docs: &ScoredDocuments,
        context: &RerankerContext,
    ) -> Result<FeatureVector> {
        self.expand_staged(docs, context).map_err(|e| e.error)
    }

    /// Rerank and report the terminal stage reached.
    pub fn rerank_with_stage(
        &self,
        docs: ScoredDocuments,
        context: &RerankerContext,
    ) -> (ScoredDocuments, Stage) {
        match self.try_rerank(&docs, context) {
            Ok(Some(reranked)) => (reranked, Stage::Done),
            Ok(None) => {
                debug!(
                    "[{}] expanded query is empty, keeping original ranking",
                    context.label()
                );
                (docs, Stage::Done)
            }
            Err(StageError { stage, error }) => {
                warn!(
                    "[{}] RM3 failed at {} stage, keeping original ranking: {}",
                    context.label(),
                    stage,
                    error
                );
                (docs, Stage::FailedPassthrough)
            }
        }
    }

    fn expand_staged(
        &self,
        docs: &ScoredDocuments,
        context: &RerankerContext,
    ) -> std::result::Result<FeatureVector, StageError> {
        assert_eq!(
            docs.ids.len(),
            docs.scores.len(),
            "document ids and scores must have the same length"
        );

        let terms = tokenize(self.analyzer.as_ref(), &context.query_text).at(Stage::Analyze)?;
        let query_vector = FeatureVector::from_terms(&terms).normalized();
        debug!(
            "[{}] {}: {} query terms",
            context.label(),
            Stage::Analyze,
            query_vector.len()
        );

        let model = self
            .estimator
            .estimate(docs, context.backend.as_ref())
            .at(Stage::Estimate)?;

        let expanded =
            FeatureVector::interpolate(&query_vector, &model, self.config.original_query_weight);
        debug!(
            "[{}] {}: {} terms",
            context.label(),
            Stage::Interpolate,
            expanded.len()
        );

        Ok(expanded)
    }

    /// `Ok(None)` means there was nothing to search for.
    fn try_rerank(
        &self,
        docs: &ScoredDocuments,
        context: &RerankerContext,
    ) -> std::result::Result<Option<ScoredDocuments>, StageError> {
        let expanded = self.expand_staged(docs, context)?;
        if expanded.is_empty() {
            return Ok(None);
        }

        let query_text = expanded.to_query_string();
        debug!("[{}] {}: {}", context.label(), Stage::Serialize, query_text);

        let backend = context.backend.as_ref();
        let query = backend
            .parse_query(&self.config.field, &query_text)
            .at(Stage::Parse)?;

        let hits = backend
            .search(query.as_ref(), context.filter(), self.config.max_results)
            .at(Stage::Search)?;
        debug!(
            "[{}] {}: {} hits",
            context.label(),
            Stage::Search,
            hits.len()
        );

        Ok(Some(ScoredDocuments::from_hits(hits)))
    }
}

impl Reranker for Rm3Reranker {
    fn rerank(&self, docs: ScoredDocuments, context: &RerankerContext) -> ScoredDocuments {
        self.rerank_with_stage(docs, context).0
    }

    fn name(&self) -> &str {
        "rm3"
    }
}

impl fmt::Debug for Rm3Reranker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rm3Reranker")
            .field("analyzer", &self.analyzer.name())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::StandardAnalyzer;
    use crate::analysis::token::TokenStream;
    use crate::search::{DocIdFilter, MemoryBackend, TermFrequencies};

    struct BrokenAnalyzer;

    impl Analyzer for BrokenAnalyzer {
        fn analyze(&self, _text: &str) -> Result<TokenStream> {
            Err(Rm3Error::analysis("dictionary not loaded"))
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }

    fn term_vector(entries: &[(&str, u64)]) -> TermFrequencies {
        entries
            .iter()
            .map(|&(term, freq)| (term.to_string(), freq))
            .collect()
    }

    fn setup() -> (Rm3Reranker, Arc<MemoryBackend>) {
        let analyzer = Arc::new(StandardAnalyzer::new());
        let backend = Arc::new(MemoryBackend::new(analyzer.clone()));
        backend.add_term_vector(1, "contents", term_vector(&[("cat", 3), ("dog", 1)]));
        backend.add_term_vector(2, "contents", term_vector(&[("cat", 1), ("bird", 2)]));
        backend.add_term_vector(3, "contents", term_vector(&[("bird", 1), ("fish", 4)]));

        let config = Rm3Config::default().with_fb_docs(2).with_fb_terms(3);
        let reranker = Rm3Reranker::new(analyzer, config).unwrap();
        (reranker, backend)
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Estimate.to_string(), "estimate");
        assert_eq!(Stage::FailedPassthrough.to_string(), "failed-passthrough");
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let analyzer = Arc::new(StandardAnalyzer::new());
        let result = Rm3Reranker::new(analyzer, Rm3Config::default().with_fb_docs(0));
        assert!(matches!(result, Err(Rm3Error::InvalidConfig(_))));
    }

    #[test]
    fn test_expand_ranks_cat_first() {
        let (reranker, backend) = setup();
        let context = RerankerContext::new("cat", backend);
        let docs = ScoredDocuments::new(vec![1, 2], vec![2.0, 1.0]);

        let expanded = reranker.expand(&docs, &context).unwrap();
        let ordered = expanded.ordered();
        assert_eq!(ordered[0].0, "cat");
        assert!(expanded.feature_weight("dog") > 0.0);
        assert!(expanded.feature_weight("bird") > 0.0);
        assert!(expanded.feature_weight("cat") >= expanded.feature_weight("dog"));
        assert!(expanded.feature_weight("cat") >= expanded.feature_weight("bird"));
        assert!((expanded.total_weight() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rerank_searches_with_expanded_query() {
        let (reranker, backend) = setup();
        let context = RerankerContext::new("cat", backend);
        let docs = ScoredDocuments::new(vec![1, 2], vec![2.0, 1.0]);

        let (reranked, stage) = reranker.rerank_with_stage(docs, &context);
        assert_eq!(stage, Stage::Done);
        // doc 3 only shares "bird" with the expansion
        assert_eq!(reranked.ids.len(), 3);
        assert_eq!(reranked.ids[2], 3);
    }

    #[test]
    fn test_filter_is_reapplied() {
        let (reranker, backend) = setup();
        let context =
            RerankerContext::new("cat", backend).with_filter(Arc::new(DocIdFilter::new([1, 2])));
        let docs = ScoredDocuments::new(vec![1, 2], vec![2.0, 1.0]);

        let reranked = reranker.rerank(docs, &context);
        assert!(!reranked.ids.contains(&3));
    }

    #[test]
    fn test_missing_term_vector_passes_through() {
        let (reranker, backend) = setup();
        let context = RerankerContext::new("cat", backend);
        let docs = ScoredDocuments::new(vec![1, 99, 2], vec![3.0, 2.0, 1.0]);

        let (reranked, stage) = reranker.rerank_with_stage(docs.clone(), &context);
        assert_eq!(stage, Stage::FailedPassthrough);
        assert_eq!(reranked, docs);
    }

    #[test]
    fn test_empty_expansion_keeps_input() {
        let (reranker, backend) = setup();
        let context = RerankerContext::new("", backend);
        let docs = ScoredDocuments::empty();

        let (reranked, stage) = reranker.rerank_with_stage(docs.clone(), &context);
        assert_eq!(stage, Stage::Done);
        assert_eq!(reranked, docs);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_length_mismatch_panics() {
        let (reranker, backend) = setup();
        let context = RerankerContext::new("cat", backend);
        let _ = reranker.rerank(ScoredDocuments::new(vec![1, 2], vec![1.0]), &context);
    }

    #[test]
    fn test_analysis_failure_passes_through() {
        let (_, backend) = setup();
        let reranker = Rm3Reranker::new(Arc::new(BrokenAnalyzer), Rm3Config::default()).unwrap();
        let context = RerankerContext::new("cat", backend);
        let docs = ScoredDocuments::new(vec![1, 2], vec![2.0, 1.0]);

        let (reranked, stage) = reranker.rerank_with_stage(docs.clone(), &context);
        assert_eq!(stage, Stage::FailedPassthrough);
        assert_eq!(reranked, docs);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_length_mismatch_panics_before_analysis() {
        let (_, backend) = setup();
        let reranker = Rm3Reranker::new(Arc::new(BrokenAnalyzer), Rm3Config::default()).unwrap();
        let context = RerankerContext::new("cat", backend);
        let _ = reranker.rerank(ScoredDocuments::new(vec![1, 2], vec![1.0]), &context);
    }
}

//! Sequential composition of rerankers.

use log::debug;

use crate::rerank::{Reranker, RerankerContext, ScoredDocuments};

/// Returns its input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityReranker;

impl Reranker for IdentityReranker {
    fn rerank(&self, docs: ScoredDocuments, _context: &RerankerContext) -> ScoredDocuments {
        docs
    }

    fn name(&self) -> &str {
        "identity"
    }
}

/// Runs rerankers one after another, each on the previous one's output.
///
/// An empty cascade behaves like [`IdentityReranker`].
#[derive(Default)]
pub struct RerankerCascade {
    stages: Vec<Box<dyn Reranker>>,
}

impl RerankerCascade {
    pub fn new() -> Self {
        RerankerCascade { stages: Vec::new() }
    }

    /// Append a stage.
    pub fn add<R: Reranker + 'static>(mut self, reranker: R) -> Self {
        self.stages.push(Box::new(reranker));
        self
    }

    /// Append a boxed stage.
    pub fn add_boxed(mut self, reranker: Box<dyn Reranker>) -> Self {
        self.stages.push(reranker);
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run every stage in order.
    pub fn run(&self, docs: ScoredDocuments, context: &RerankerContext) -> ScoredDocuments {
        self.stages.iter().fold(docs, |docs, stage| {
            debug!(
                "[{}] running stage '{}' on {} documents",
                context.label(),
                stage.name(),
                docs.len()
            );
            stage.rerank(docs, context)
        })
    }
}

impl Reranker for RerankerCascade {
    fn rerank(&self, docs: ScoredDocuments, context: &RerankerContext) -> ScoredDocuments {
        self.run(docs, context)
    }

    fn name(&self) -> &str {
        "cascade"
    }
}

impl std::fmt::Debug for RerankerCascade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RerankerCascade")
            .field("stages", &self.names())
            .finish()
    }
}

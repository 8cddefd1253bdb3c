//! Parallel reranking of independent queries.

use rayon::prelude::*;

use crate::rerank::{Reranker, RerankerContext, ScoredDocuments};

/// Rerank many independent `(docs, context)` pairs in parallel.
///
/// Output order matches input order.
pub fn rerank_batch<R>(
    reranker: &R,
    requests: Vec<(ScoredDocuments, RerankerContext)>,
) -> Vec<ScoredDocuments>
where
    R: Reranker + ?Sized,
{
    requests
        .into_par_iter()
        .map(|(docs, context)| reranker.rerank(docs, &context))
        .collect()
}

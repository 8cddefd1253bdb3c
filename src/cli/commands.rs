//! Command implementations for the rm3 CLI.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use log::info;
use serde::Deserialize;

use crate::analysis::analyzer::{Analyzer, StandardAnalyzer};
use crate::analysis::tokenize;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::{Result, Rm3Error};
use crate::query::{BooleanQueryBuilder, TermQuery};
use crate::rerank::{RerankerContext, ScoredDocuments};
use crate::rm3::{Rm3Config, Rm3Reranker, Stopper};
use crate::search::{MemoryBackend, SearchBackend};

/// One line of a JSONL corpus.
#[derive(Debug, Deserialize)]
struct CorpusRecord {
    id: u64,
    text: String,
}

/// Everything a command needs after setup: the loaded backend, the reranker,
/// and the first-pass ranking.
struct Session {
    reranker: Rm3Reranker,
    context: RerankerContext,
    initial: ScoredDocuments,
}

/// Execute a CLI command.
pub fn execute_command(args: Rm3Args) -> Result<()> {
    match &args.command {
        Command::Expand(expand_args) => expand(expand_args, &args),
        Command::Search(search_args) => search(search_args, &args),
    }
}

fn expand(args: &ExpandArgs, cli_args: &Rm3Args) -> Result<()> {
    let session = prepare(&args.common)?;
    let expanded = session.reranker.expand(&session.initial, &session.context)?;

    let feedback_docs = session
        .initial
        .len()
        .min(session.reranker.config().fb_docs);
    let terms = expanded
        .ordered()
        .into_iter()
        .map(|(term, weight)| WeightedTerm { term, weight })
        .collect();

    output_result(
        &ExpansionResult {
            query: args.common.query.clone(),
            feedback_docs,
            terms,
            query_string: expanded.to_query_string(),
        },
        cli_args,
    )
}

fn search(args: &SearchArgs, cli_args: &Rm3Args) -> Result<()> {
    let session = prepare(&args.common)?;

    let initial_hits = args.initial.then(|| {
        let mut initial = session.initial.clone();
        initial.truncate(args.limit);
        initial.hits()
    });

    let (reranked, stage) = session
        .reranker
        .rerank_with_stage(session.initial, &session.context);
    let total_hits = reranked.len();
    let mut hits = reranked.hits();
    hits.truncate(args.limit);

    output_result(
        &SearchResults {
            query: args.common.query.clone(),
            stage: stage.to_string(),
            initial_hits,
            hits,
            total_hits,
        },
        cli_args,
    )
}

fn prepare(args: &CommonArgs) -> Result<Session> {
    let config = build_config(args)?;

    let analyzer: Arc<dyn Analyzer> = if args.english_stopwords {
        Arc::new(StandardAnalyzer::with_stopper(Arc::new(Stopper::english())))
    } else {
        Arc::new(StandardAnalyzer::new())
    };

    let backend = load_corpus(&args.corpus, &config.field, analyzer.clone())?;
    info!(
        "Loaded {} documents from {}",
        backend.len(),
        args.corpus.display()
    );

    let initial = initial_search(
        &*backend,
        analyzer.as_ref(),
        &config.field,
        &args.query,
        config.max_results,
    )?;
    info!("First pass returned {} hits", initial.len());

    let reranker = Rm3Reranker::new(analyzer, config)?;
    let context = RerankerContext::new(args.query.clone(), backend);

    Ok(Session {
        reranker,
        context,
        initial,
    })
}

/// Start from the config file (or defaults) and apply flag overrides.
fn build_config(args: &CommonArgs) -> Result<Rm3Config> {
    let mut config = match &args.config {
        Some(path) => Rm3Config::from_file(path)?,
        None => Rm3Config::default(),
    };

    if let Some(fb_terms) = args.fb_terms {
        config.fb_terms = fb_terms;
    }
    if let Some(fb_docs) = args.fb_docs {
        config.fb_docs = fb_docs;
    }
    if let Some(weight) = args.original_query_weight {
        config.original_query_weight = weight;
    }
    if let Some(field) = &args.field {
        config.field = field.clone();
    }
    if let Some(path) = &args.stopwords {
        config.stopword_file = Some(path.clone());
    }

    config.validate()?;
    Ok(config)
}

/// Load a JSONL corpus into a fresh in-memory backend.
fn load_corpus(
    path: &Path,
    field: &str,
    analyzer: Arc<dyn Analyzer>,
) -> Result<Arc<MemoryBackend>> {
    let backend = MemoryBackend::new(analyzer);
    let reader = BufReader::new(File::open(path)?);

    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: CorpusRecord = serde_json::from_str(&line).map_err(|e| {
            Rm3Error::other(format!(
                "{}:{}: invalid corpus record: {e}",
                path.display(),
                line_number + 1
            ))
        })?;
        backend.add_text(record.id, field, &record.text)?;
    }

    Ok(Arc::new(backend))
}

/// First retrieval pass: a disjunction of the analyzed query terms.
fn initial_search(
    backend: &dyn SearchBackend,
    analyzer: &dyn Analyzer,
    field: &str,
    query_text: &str,
    max_results: usize,
) -> Result<ScoredDocuments> {
    let query = tokenize(analyzer, query_text)?
        .into_iter()
        .fold(BooleanQueryBuilder::new(), |builder, term| {
            builder.should(Box::new(TermQuery::new(field, term)))
        })
        .build();

    let hits = backend.search(&query, None, max_results)?;
    Ok(ScoredDocuments::from_hits(hits))
}

//! Command line argument parsing for the rm3 CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// rm3 - RM3 pseudo-relevance feedback over a JSONL corpus
#[derive(Parser, Debug, Clone)]
#[command(name = "rm3")]
#[command(about = "Expand queries and rerank results with RM3 pseudo-relevance feedback")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct Rm3Args {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl Rm3Args {
    /// Effective verbosity: 0 quiet, 1 default, 2 verbose, 3+ debug.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the RM3-expanded query for QUERY
    Expand(ExpandArgs),

    /// Search with QUERY and print the RM3 reranked hits
    Search(SearchArgs),
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// JSONL corpus, one {"id": <u64>, "text": <string>} object per line
    #[arg(value_name = "CORPUS")]
    pub corpus: PathBuf,

    /// Query text
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// RM3 configuration file (JSON); flags below override it
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Number of expansion terms
    #[arg(long)]
    pub fb_terms: Option<usize>,

    /// Number of feedback documents
    #[arg(long)]
    pub fb_docs: Option<usize>,

    /// Weight of the original query, in [0, 1]
    #[arg(long)]
    pub original_query_weight: Option<f32>,

    /// Field the corpus text is stored in and searched
    #[arg(long)]
    pub field: Option<String>,

    /// Stopword file, one word per line, applied to feedback terms
    #[arg(long, value_name = "STOPWORD_FILE")]
    pub stopwords: Option<PathBuf>,

    /// Drop common English stopwords when analyzing corpus and query
    #[arg(long)]
    pub english_stopwords: bool,
}

/// Arguments for the expand command
#[derive(Args, Debug, Clone)]
pub struct ExpandArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the search command
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Maximum number of hits to print
    #[arg(short, long, default_value = "10")]
    pub limit: usize,

    /// Also print the first-pass hits
    #[arg(long)]
    pub initial: bool,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

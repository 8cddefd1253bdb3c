//! Output formatting for CLI commands.

use std::fmt;

use serde::Serialize;

use crate::cli::args::{OutputFormat, Rm3Args};
use crate::error::Result;
use crate::search::SearchHit;

/// A term of the expanded query with its interpolated weight.
#[derive(Debug, Clone, Serialize)]
pub struct WeightedTerm {
    pub term: String,
    pub weight: f32,
}

/// Result of the expand command.
#[derive(Debug, Serialize)]
pub struct ExpansionResult {
    pub query: String,
    pub feedback_docs: usize,
    pub terms: Vec<WeightedTerm>,
    pub query_string: String,
}

impl fmt::Display for ExpansionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Expanded query for \"{}\" ({} feedback documents):",
            self.query, self.feedback_docs
        )?;
        for (i, term) in self.terms.iter().enumerate() {
            writeln!(f, "{:3}. {:.6}  {}", i + 1, term.weight, term.term)?;
        }
        Ok(())
    }
}

/// Result of the search command.
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub stage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_hits: Option<Vec<SearchHit>>,
    pub hits: Vec<SearchHit>,
    pub total_hits: usize,
}

fn write_hits(f: &mut fmt::Formatter<'_>, hits: &[SearchHit]) -> fmt::Result {
    if hits.is_empty() {
        return writeln!(f, "  (no hits)");
    }
    for (i, hit) in hits.iter().enumerate() {
        writeln!(f, "{:3}. doc {:<8} score {:.4}", i + 1, hit.doc_id, hit.score)?;
    }
    Ok(())
}

impl fmt::Display for SearchResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(initial) = &self.initial_hits {
            writeln!(f, "Initial hits for \"{}\":", self.query)?;
            write_hits(f, initial)?;
            writeln!(f)?;
        }
        writeln!(
            f,
            "RM3 hits for \"{}\" ({} total, {}):",
            self.query, self.total_hits, self.stage
        )?;
        write_hits(f, &self.hits)
    }
}

/// Output a command result in the requested format.
pub fn output_result<T: Serialize + fmt::Display>(result: &T, args: &Rm3Args) -> Result<()> {
    print!("{}", render(result, args.output_format, args.pretty)?);
    Ok(())
}

fn render<T: Serialize + fmt::Display>(
    result: &T,
    format: OutputFormat,
    pretty: bool,
) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(result.to_string()),
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(result)? + "\n"),
        OutputFormat::Json => Ok(serde_json::to_string(result)? + "\n"),
    }
}

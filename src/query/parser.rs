//! Parser for boosted-term query strings.
//!
//! This is the wire format between the expansion step and a backend: a
//! whitespace-separated list of entries, each `term` or `term^boost`, all
//! targeting the parser's field. Terms are taken verbatim up to the last
//! `^`. There are no operators, phrases, field prefixes or grouping, so a
//! term such as `re:invent` reaches the field unchanged.
//!
//! ```
//! use rm3::query::{BooleanQuery, Query, QueryParser};
//!
//! let parser = QueryParser::new("contents");
//! let query = parser.parse("cat^0.6 dog^0.25 bird^0.15").unwrap();
//!
//! let boolean = query.as_any().downcast_ref::<BooleanQuery>().unwrap();
//! assert_eq!(boolean.clauses().len(), 3);
//! assert_eq!(query.description(), "(contents:cat^0.6 contents:dog^0.25 contents:bird^0.15)");
//! ```

use crate::analysis::analyzer::{Analyzer, WhitespaceAnalyzer};
use crate::error::{Result, Rm3Error};
use crate::query::{BooleanQuery, BooleanQueryBuilder, Query, TermQuery};

/// Whitespace-only parser producing term and boolean-of-terms queries.
#[derive(Debug, Clone)]
pub struct QueryParser {
    /// Field every entry targets.
    default_field: String,
    analyzer: WhitespaceAnalyzer,
}

impl QueryParser {
    /// Create a parser whose terms target `default_field`.
    pub fn new<S: Into<String>>(default_field: S) -> Self {
        QueryParser {
            default_field: default_field.into(),
            analyzer: WhitespaceAnalyzer::new(),
        }
    }

    /// Get the default field.
    pub fn default_field(&self) -> &str {
        &self.default_field
    }

    /// Parse a query string.
    ///
    /// Empty input gives an empty [`BooleanQuery`], a single entry gives a
    /// [`TermQuery`], several entries give a BooleanQuery of SHOULD clauses
    /// in input order.
    pub fn parse(&self, query_str: &str) -> Result<Box<dyn Query>> {
        let mut queries = Vec::new();
        for token in self.analyzer.analyze(query_str)? {
            queries.push(self.parse_entry(&token.text)?);
        }

        match queries.len() {
            0 => Ok(Box::new(BooleanQuery::new())),
            1 => Ok(Box::new(queries.remove(0))),
            _ => {
                let builder = queries
                    .into_iter()
                    .fold(BooleanQueryBuilder::new(), |builder, query| {
                        builder.should(Box::new(query))
                    });
                Ok(Box::new(builder.build()))
            }
        }
    }

    fn parse_entry(&self, entry: &str) -> Result<TermQuery> {
        let (term, boost) = match entry.rsplit_once('^') {
            Some((term, boost_str)) => (term, Self::parse_boost(entry, boost_str)?),
            None => (entry, 1.0),
        };

        if term.is_empty() {
            return Err(Rm3Error::parse(format!("Missing term in '{entry}'")));
        }

        Ok(TermQuery::new(self.default_field.as_str(), term).with_boost(boost))
    }

    fn parse_boost(entry: &str, boost_str: &str) -> Result<f32> {
        let boost: f32 = boost_str
            .parse()
            .map_err(|_| Rm3Error::parse(format!("Invalid boost '{boost_str}' in '{entry}'")))?;

        if !boost.is_finite() || boost < 0.0 {
            return Err(Rm3Error::parse(format!(
                "Boost must be a finite non-negative number in '{entry}'"
            )));
        }

        Ok(boost)
    }
}

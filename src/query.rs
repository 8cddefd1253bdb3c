//! Query model handed to search backends.
//!
//! Queries here are plain descriptions: a backend decides how to execute
//! them, usually by downcasting through [`Query::as_any`] to the concrete
//! [`TermQuery`] and [`BooleanQuery`] types.

pub mod boolean;
pub mod parser;
pub mod term;

use std::any::Any;
use std::fmt::Debug;

pub use self::boolean::{BooleanClause, BooleanQuery, BooleanQueryBuilder, Occur};
pub use self::parser::QueryParser;
pub use self::term::TermQuery;

/// Trait for search queries.
pub trait Query: Send + Sync + Debug {
    /// Get the boost factor for this query.
    fn boost(&self) -> f32;

    /// Set the boost factor for this query.
    fn set_boost(&mut self, boost: f32);

    /// Get a human-readable description of this query.
    fn description(&self) -> String;

    /// Clone this query.
    fn clone_box(&self) -> Box<dyn Query>;

    /// Get this query as Any for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Get the field name this query searches in, if applicable.
    /// Returns None for queries that don't target a specific field (e.g., BooleanQuery).
    fn field(&self) -> Option<&str> {
        None
    }
}

impl Clone for Box<dyn Query> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

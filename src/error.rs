//! Error types for the rm3 library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`Rm3Error`] enum. Errors raised while expanding a query are recovered by
//! the reranker itself (the original ranking is returned), so callers mostly
//! see them from configuration loading and from backends they implement.
//!
//! # Examples
//!
//! ```
//! use rm3::error::{Rm3Error, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(Rm3Error::invalid_config("fb_terms must be positive"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for rm3 operations.
#[derive(Error, Debug)]
pub enum Rm3Error {
    /// I/O errors (file operations, backend transport, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Analysis errors, raised by custom analyzers
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Query-related errors (parsing, invalid queries, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Search backend errors (term vector fetch, query execution)
    #[error("Backend error: {0}")]
    Backend(String),

    /// A document or term vector the caller asked for does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with Rm3Error.
pub type Result<T> = std::result::Result<T, Rm3Error>;

impl Rm3Error {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        Rm3Error::Analysis(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        Rm3Error::Query(msg.into())
    }

    /// Create a new parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Rm3Error::Query(msg.into()) // Parse errors are treated as query errors
    }

    /// Create a new backend error.
    pub fn backend<S: Into<String>>(msg: S) -> Self {
        Rm3Error::Backend(msg.into())
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Rm3Error::NotFound(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Rm3Error::InvalidConfig(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Rm3Error::Other(msg.into())
    }
}

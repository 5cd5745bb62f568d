//! Error types for the engine.
//!
//! Every failure mode surfaces as one of the kinds the design calls out:
//! syntax errors from the parser, schema errors for unknown or duplicate
//! tables/columns, constraint errors for uniqueness/not-null violations,
//! type errors for failed coercions, and not-found for missing rows.

use crate::parser::SyntaxError;

/// The error type returned by every fallible operation in this crate.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// The SQL text could not be tokenized or parsed.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// Unknown table/column, or a duplicate table name.
    #[error("schema error: {0}")]
    Schema(String),

    /// A UNIQUE or NOT NULL constraint was violated.
    #[error("constraint error: {0}")]
    Constraint(String),

    /// A value could not be coerced to a column's declared type.
    #[error("type error: {0}")]
    Type(String),

    /// An UPDATE/DELETE targeted a row id that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The snapshot file could not be read or written.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot file was not valid JSON, or didn't match the expected shape.
    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DbError>;

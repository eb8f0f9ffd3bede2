//! Error types for dblint

use thiserror::Error;

/// Result type for dblint operations.
pub type LintResult<T> = Result<T, LintError>;

/// Error type for dblint operations.
#[derive(Debug, Error)]
pub enum LintError {
    /// Database error from tokio-postgres.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),
    /// A foreign key, view or trigger names a table the schema does not contain.
    #[error("Unknown table '{0}' referenced by the schema")]
    UnknownTable(String),
    /// A constraint, index, trigger or foreign key names a column its table does not have.
    #[error("Unknown column '{column}' on table '{table}'")]
    UnknownColumn { table: String, column: String },
    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Decode error when reading a catalog column.
    #[error("Decode error for column '{column}': {message}")]
    Decode { column: String, message: String },
    /// IO or other error.
    #[error("{0}")]
    Other(String),
}

impl LintError {
    /// Create a decode error.
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        LintError::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create an unknown column error.
    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        LintError::UnknownColumn {
            table: table.into(),
            column: column.into(),
        }
    }
}

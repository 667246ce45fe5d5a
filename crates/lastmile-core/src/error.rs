//! Error types for lastmile-core

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, LastmileError>;

/// Main error type for dashboard operations
///
/// `QueryExecution` is the only variant expected at runtime; it is fatal for the
/// request that raised it. `CursorExhausted` and `ColumnNotFound` mean a caller
/// broke the cursor contract.
#[derive(Error, Debug)]
pub enum LastmileError {
    /// The database rejected or failed to run a statement
    #[error("Query execution failed: {0}")]
    QueryExecution(String),

    /// A cursor was read past its last row
    #[error("Cursor exhausted: no more rows")]
    CursorExhausted,

    /// A row does not carry the requested column
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// A column value cannot be read as the requested type
    #[error("Invalid type for column {column}: {message}")]
    InvalidColumnType { column: String, message: String },

    /// Submitted form fields do not describe a valid edit
    #[error("Invalid form input: {0}")]
    InvalidForm(String),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<rusqlite::Error> for LastmileError {
    fn from(err: rusqlite::Error) -> Self {
        LastmileError::QueryExecution(err.to_string())
    }
}

//! Error types for recordkit

use thiserror::Error;

/// Result type alias for recordkit operations
pub type DbResult<T> = Result<T, DbError>;

/// Message carried by every guard violation on a DAO-mode record.
pub const READ_ONLY_MESSAGE: &str = "only read/query operations are allowed on this instance";

/// Error types for SQL generation and record access
#[derive(Debug, Error)]
pub enum DbError {
    /// Invalid caller-supplied configuration (table name, primary keys, paging)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Access to a DAO-mode (query-only) record or container
    #[error("Operation not permitted: {READ_ONLY_MESSAGE}")]
    ReadOnly,

    /// A parameter could not be bound to the statement
    #[error("Binding error on parameter {index}: {message}")]
    Binding { index: usize, message: String },

    /// JSON encode/decode error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Statement execution failed in the executor
    #[error("Execution error: {0}")]
    Execution(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl DbError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a binding error for a 1-based parameter index
    pub fn binding(index: usize, message: impl Into<String>) -> Self {
        Self::Binding {
            index,
            message: message.into(),
        }
    }

    /// Create an execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is a guard violation
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::ReadOnly)
    }

    /// Check if this is a binding error
    pub fn is_binding(&self) -> bool {
        matches!(self, Self::Binding { .. })
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

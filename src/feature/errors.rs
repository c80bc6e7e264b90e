//! Feature store error types
//!
//! Error codes:
//! - GEO_UNKNOWN_TYPE
//! - GEO_QUERY_FAILED
//! - GEO_STORE_DECODE
//! - GEO_STORE_IO
//! - GEO_STORE_CONNECT
//!
//! All of these are failures reported by the store side of the adapter.
//! The projector surfaces them as external query failures.

use std::io;

use thiserror::Error;

/// Result type for feature store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a feature store or its cursor
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// The store has no feature type by this name
    #[error("Unknown feature type: {0}")]
    UnknownType(String),

    /// The store rejected or failed to execute a query
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A feature could not be decoded
    #[error("Failed to decode feature at line {line}: {reason}")]
    Decode { line: usize, reason: String },

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(String),

    /// Connection settings were rejected before the store was opened
    #[error("Cannot connect to store: {0}")]
    Connect(String),
}

impl StoreError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::UnknownType(_) => "GEO_UNKNOWN_TYPE",
            StoreError::QueryFailed(_) => "GEO_QUERY_FAILED",
            StoreError::Decode { .. } => "GEO_STORE_DECODE",
            StoreError::Io(_) => "GEO_STORE_IO",
            StoreError::Connect(_) => "GEO_STORE_CONNECT",
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Io(e.to_string())
    }
}

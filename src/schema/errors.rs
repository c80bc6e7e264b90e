//! Schema error types
//!
//! Error codes:
//! - GEO_MALFORMED_SCHEMA
//! - GEO_SCHEMA_IO

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while reading field descriptors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// A type spec entry or attribute descriptor could not be parsed
    #[error("Malformed schema '{source_text}': {reason}")]
    Malformed { source_text: String, reason: String },

    /// A schema file could not be read
    #[error("Failed to read schema file {path}: {reason}")]
    Io { path: String, reason: String },
}

impl SchemaError {
    /// Create a malformed schema error
    pub fn malformed(source_text: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::Malformed {
            source_text: source_text.into(),
            reason: reason.into(),
        }
    }

    /// Create a schema file I/O error
    pub fn io(path: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::Io {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::Malformed { .. } => "GEO_MALFORMED_SCHEMA",
            SchemaError::Io { .. } => "GEO_SCHEMA_IO",
        }
    }
}

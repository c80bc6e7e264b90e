//! Output error types
//!
//! Error codes:
//! - GEO_OUTPUT_IO
//! - plus every projector code, passed through unchanged

use thiserror::Error;

use crate::projector::ProjectorError;

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Errors raised while writing results
#[derive(Debug, Error)]
pub enum OutputError {
    /// The destination could not be created or written
    #[error("Failed to write {path}: {reason}")]
    Io { path: String, reason: String },

    /// The projection feeding the output failed
    #[error(transparent)]
    Projection(#[from] ProjectorError),
}

impl OutputError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            OutputError::Io { .. } => "GEO_OUTPUT_IO",
            OutputError::Projection(e) => e.code(),
        }
    }
}

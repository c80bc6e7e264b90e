//! Filter builder error types
//!
//! Error codes:
//! - GEO_INVALID_RANGE

use thiserror::Error;

/// Result type for filter construction
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors raised while building filter fragments
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// Spatial or temporal bounds that do not describe a valid range
    #[error("Invalid range for '{field}': {reason}")]
    InvalidRange { field: String, reason: String },
}

impl FilterError {
    /// Create an invalid range error
    pub fn invalid_range(field: impl Into<String>, reason: impl Into<String>) -> Self {
        FilterError::InvalidRange {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            FilterError::InvalidRange { .. } => "GEO_INVALID_RANGE",
        }
    }

    /// Returns the field the error refers to
    pub fn field(&self) -> &str {
        match self {
            FilterError::InvalidRange { field, .. } => field,
        }
    }
}

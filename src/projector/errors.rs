//! Projector error types
//!
//! Error codes:
//! - GEO_UNSUPPORTED_FIELD_TYPE
//! - GEO_MISSING_PROPERTY
//! - GEO_TYPE_MISMATCH
//! - GEO_EXTERNAL_QUERY_FAILURE
//! - GEO_SINK_FAILED
//!
//! Every projector error aborts the whole projection. No partial result
//! set is ever returned.

use thiserror::Error;

use crate::feature::StoreError;
use crate::schema::FieldType;

/// Result type for projector operations
pub type ProjectorResult<T> = Result<T, ProjectorError>;

/// Errors raised while projecting features into records
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectorError {
    /// A field's type tag is outside the supported set
    #[error("Unsupported type '{type_tag}' for field '{field}'")]
    UnsupportedFieldType { field: String, type_tag: String },

    /// A feature has no value for a declared field
    #[error("Feature {index} has no property '{field}'")]
    MissingProperty { field: String, index: usize },

    /// A value cannot be converted to its declared type
    #[error("Feature {index} field '{field}': expected {field_type}, found {found}")]
    TypeMismatch {
        field: String,
        field_type: FieldType,
        found: &'static str,
        index: usize,
    },

    /// The store failed while the cursor was being read
    #[error("External query failure after {consumed} features: {source}")]
    ExternalQueryFailure {
        consumed: usize,
        #[source]
        source: StoreError,
    },

    /// The record sink rejected a record
    #[error("Failed to write record {index}: {reason}")]
    Sink { index: usize, reason: String },
}

impl ProjectorError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ProjectorError::UnsupportedFieldType { .. } => "GEO_UNSUPPORTED_FIELD_TYPE",
            ProjectorError::MissingProperty { .. } => "GEO_MISSING_PROPERTY",
            ProjectorError::TypeMismatch { .. } => "GEO_TYPE_MISMATCH",
            ProjectorError::ExternalQueryFailure { .. } => "GEO_EXTERNAL_QUERY_FAILURE",
            ProjectorError::Sink { .. } => "GEO_SINK_FAILED",
        }
    }

    /// Field the error refers to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            ProjectorError::UnsupportedFieldType { field, .. }
            | ProjectorError::MissingProperty { field, .. }
            | ProjectorError::TypeMismatch { field, .. } => Some(field),
            _ => None,
        }
    }

    /// 1-based feature index the error refers to, if any
    pub fn index(&self) -> Option<usize> {
        match self {
            ProjectorError::MissingProperty { index, .. }
            | ProjectorError::TypeMismatch { index, .. }
            | ProjectorError::Sink { index, .. } => Some(*index),
            _ => None,
        }
    }
}

impl From<StoreError> for ProjectorError {
    fn from(source: StoreError) -> Self {
        ProjectorError::ExternalQueryFailure {
            consumed: 0,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = ProjectorError::UnsupportedFieldType {
            field: "Blob".into(),
            type_tag: "blob".into(),
        };
        assert_eq!(err.code(), "GEO_UNSUPPORTED_FIELD_TYPE");
        assert_eq!(err.field(), Some("Blob"));
        assert_eq!(err.index(), None);

        let err = ProjectorError::MissingProperty {
            field: "Who".into(),
            index: 3,
        };
        assert_eq!(err.code(), "GEO_MISSING_PROPERTY");
        assert_eq!(err.index(), Some(3));
        assert_eq!(err.to_string(), "Feature 3 has no property 'Who'");
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = ProjectorError::TypeMismatch {
            field: "What".into(),
            field_type: FieldType::Long,
            found: "text",
            index: 2,
        };
        assert_eq!(err.to_string(), "Feature 2 field 'What': expected long, found text");
    }

    #[test]
    fn test_external_failure_keeps_source() {
        use std::error::Error as _;

        let err: ProjectorError = StoreError::QueryFailed("zookeeper unreachable".into()).into();
        assert_eq!(err.code(), "GEO_EXTERNAL_QUERY_FAILURE");
        assert!(err.source().unwrap().to_string().contains("zookeeper"));
    }
}

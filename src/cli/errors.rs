//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero status. Domain errors
//! keep their own code in the message.

use std::fmt;
use std::io;

use crate::feature::StoreError;
use crate::filter::FilterError;
use crate::output::OutputError;
use crate::projector::ProjectorError;
use crate::schema::SchemaError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdin/stdout)
    IoError,
    /// Filter arguments rejected
    FilterError,
    /// Schema could not be read
    SchemaError,
    /// Store query or projection failed
    QueryError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "GEO_CLI_CONFIG_ERROR",
            Self::IoError => "GEO_CLI_IO_ERROR",
            Self::FilterError => "GEO_CLI_FILTER_ERROR",
            Self::SchemaError => "GEO_CLI_SCHEMA_ERROR",
            Self::QueryError => "GEO_CLI_QUERY_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Get the error code
    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<FilterError> for CliError {
    fn from(e: FilterError) -> Self {
        Self::new(CliErrorCode::FilterError, format!("[{}] {}", e.code(), e))
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::new(CliErrorCode::SchemaError, format!("[{}] {}", e.code(), e))
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::new(CliErrorCode::QueryError, format!("[{}] {}", e.code(), e))
    }
}

impl From<ProjectorError> for CliError {
    fn from(e: ProjectorError) -> Self {
        Self::new(CliErrorCode::QueryError, format!("[{}] {}", e.code(), e))
    }
}

impl From<OutputError> for CliError {
    fn from(e: OutputError) -> Self {
        let code = match e {
            OutputError::Io { .. } => CliErrorCode::IoError,
            OutputError::Projection(_) => CliErrorCode::QueryError,
        };
        Self::new(code, format!("[{}] {}", e.code(), e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

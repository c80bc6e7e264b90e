//! Lifecycle events emitted while building, running and projecting queries

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Setup
    ConfigLoaded,
    ConfigDefaulted,
    SchemaLoaded,
    StoreConnected,
    StoreConnectFailed,

    // Query
    FilterBuilt,
    QueryStart,
    QueryFailed,

    // Projection
    ProjectionStart,
    ProjectionComplete,
    ProjectionFailed,
    CursorClosed,

    // Output
    OutputWritten,
}

impl Event {
    /// Returns the event name as logged
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ConfigDefaulted => "CONFIG_DEFAULTED",
            Event::StoreConnected => "STORE_CONNECTED",
            Event::StoreConnectFailed => "STORE_CONNECT_FAILED",
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::FilterBuilt => "FILTER_BUILT",
            Event::QueryStart => "QUERY_START",
            Event::QueryFailed => "QUERY_FAILED",
            Event::ProjectionStart => "PROJECTION_START",
            Event::ProjectionComplete => "PROJECTION_COMPLETE",
            Event::ProjectionFailed => "PROJECTION_FAILED",
            Event::CursorClosed => "CURSOR_CLOSED",
            Event::OutputWritten => "OUTPUT_WRITTEN",
        }
    }

    /// Returns true for events that report a failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::QueryFailed | Event::ProjectionFailed | Event::StoreConnectFailed
        )
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            e if e.is_failure() => Severity::Error,
            Event::ConfigDefaulted => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

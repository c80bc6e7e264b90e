//! Structured logging for query and projection lifecycle events
//!
//! ```ignore
//! use geoquick::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::ProjectionComplete, &[("records", "9")]);
//! ```
//!
//! Logging is read-only: it has no effect on results and never fails the
//! operation that emits it.

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

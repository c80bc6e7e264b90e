//! Result projector
//!
//! Turns the features behind a store cursor into plain records, using the
//! field type map reported by the store's schema.
//!
//! # Invariants
//!
//! - The cursor is closed exactly once, whatever the outcome
//! - Errors abort the whole projection; no partial result set
//! - Records keep the field map's declaration order
//! - Record `n` is the `n`th feature the cursor produced (1-based)

mod convert;
mod errors;
mod guard;
mod projector;
mod record;
mod sink;

pub use convert::{convert_value, format_native_date, parse_native_date, NATIVE_DATE_FORMAT};
pub use errors::{ProjectorError, ProjectorResult};
pub use projector::ResultProjector;
pub use record::{DateValue, FieldValue, PointValue, Record, ResultSet};
pub use sink::RecordSink;

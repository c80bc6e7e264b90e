//! Feature store adapter interfaces
//!
//! The store, its index and its query engine live outside this crate. This
//! module defines what the rest of the crate needs from them: run a filter,
//! walk the results with a closeable cursor, and read property values.
//!
//! `connect` checks connection settings and wraps a store in a handle.
//!
//! Two adapters are provided:
//! - `FixtureStore`: replays canned responses keyed by filter text
//! - `JsonLinesCursor`: reads features exported as JSON lines

mod connect;
mod errors;
mod jsonl;
mod memory;
mod traits;
mod value;

pub use connect::{connect, StoreHandle, REQUIRED_PARAMS};
pub use errors::{StoreError, StoreResult};
pub use jsonl::{JsonLinesCursor, FID_KEY};
pub use memory::{FixtureStore, MemoryFeature, VecCursor};
pub use traits::{Feature, FeatureCursor, FeatureStore};
pub use value::{Geometry, RawValue};

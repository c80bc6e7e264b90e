//! geoquick - ECQL filters and typed result projection for GeoMesa feature stores
//!
//! Builds ECQL filter strings, reads feature type descriptors into ordered
//! field maps, and drains feature cursors into records of native values.

pub mod cli;
pub mod feature;
pub mod filter;
pub mod observability;
pub mod output;
pub mod projector;
pub mod schema;

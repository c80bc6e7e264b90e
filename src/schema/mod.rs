//! Field descriptors for feature types
//!
//! A store reports each attribute of a feature type as a name, a type tag,
//! a nillable flag and an optional default. This module models that map,
//! resolves tags into the closed [`FieldType`] set, and parses the textual
//! schema forms GeoMesa exposes.
//!
//! # Design Principles
//!
//! - Declaration order is preserved; it is the record column order
//! - Tags stay as reported until a projection resolves them
//! - Tag matching ignores case and Java package prefixes

mod errors;
mod loader;
mod spec;
mod types;

pub use errors::{SchemaError, SchemaResult};
pub use loader::{load_field_types, save_field_types};
pub use spec::{parse_attribute_descriptor, parse_type_spec};
pub use types::{FieldDescriptor, FieldType, FieldTypes, UnknownFieldType};

//! ECQL filter builder
//!
//! Composes spatial, temporal and attribute predicates into one ECQL string
//! that the feature store evaluates. Nothing here parses ECQL; fragments are
//! text templates with bounds checks on the numeric and temporal inputs.

mod builder;
mod errors;
mod expr;

pub use builder::{
    attribute_filter, bbox_filter, combine, combine_grouped, during_filter, within_filter,
};
pub use errors::{FilterError, FilterResult};
pub use expr::{FilterExpr, INCLUDE};

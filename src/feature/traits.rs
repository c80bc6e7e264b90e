//! The adapter seam between this crate and a feature store
//!
//! A concrete store client implements [`FeatureStore`]. Query results come
//! back as a [`FeatureCursor`], which the caller must close once it is done
//! with it, including when iteration fails part way.

use crate::filter::FilterExpr;
use crate::schema::FieldTypes;

use super::errors::StoreResult;
use super::value::RawValue;

/// One result row
pub trait Feature {
    /// Feature identifier, if the store assigns one
    fn id(&self) -> Option<&str>;

    /// Value of a property, or `None` if the feature has no such property
    fn property(&self, name: &str) -> Option<RawValue>;
}

/// A lazy cursor over query results
pub trait FeatureCursor {
    type Item: Feature;

    /// Returns true if another feature is available
    fn has_next(&mut self) -> StoreResult<bool>;

    /// Returns the next feature
    fn next(&mut self) -> StoreResult<Self::Item>;

    /// Release resources held by the cursor
    fn close(&mut self);
}

/// Query and schema access for a feature store
pub trait FeatureStore {
    type Cursor: FeatureCursor;

    /// Names of the feature types in the store
    fn type_names(&self) -> Vec<String>;

    /// Field descriptors of a feature type
    fn field_types(&self, type_name: &str) -> StoreResult<FieldTypes>;

    /// Execute a filter against a feature type
    fn get_features(&self, type_name: &str, filter: &FilterExpr) -> StoreResult<Self::Cursor>;
}

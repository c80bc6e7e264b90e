//! In-memory features and a fixture-backed store
//!
//! `FixtureStore` does not evaluate ECQL. It answers a query with the
//! features registered for that exact filter text, which makes it a
//! stand-in for a live store in demos and tests.

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::filter::FilterExpr;
use crate::schema::FieldTypes;

use super::errors::{StoreError, StoreResult};
use super::traits::{Feature, FeatureCursor, FeatureStore};
use super::value::RawValue;

/// A feature held entirely in memory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryFeature {
    id: Option<String>,
    properties: Vec<(String, RawValue)>,
}

impl MemoryFeature {
    /// Create a feature with no properties
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a feature with an identifier
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            properties: Vec::new(),
        }
    }

    /// Set a property, replacing any previous value
    pub fn set(mut self, name: impl Into<String>, value: RawValue) -> Self {
        let name = name.into();
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.properties.push((name, value)),
        }
        self
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl Feature for MemoryFeature {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn property(&self, name: &str) -> Option<RawValue> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }
}

/// Cursor over a fixed list of features.
///
/// Counts `close` calls so callers can check release behaviour. Any use
/// after close is a query failure.
#[derive(Debug, Default)]
pub struct VecCursor {
    items: VecDeque<StoreResult<MemoryFeature>>,
    close_count: usize,
}

impl VecCursor {
    /// Create a cursor over the given features
    pub fn new(features: impl IntoIterator<Item = MemoryFeature>) -> Self {
        Self {
            items: features.into_iter().map(Ok).collect(),
            close_count: 0,
        }
    }

    /// Append a failure that `next` returns once the preceding features are consumed
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.items
            .push_back(Err(StoreError::QueryFailed(message.into())));
        self
    }

    /// Number of times `close` was called
    pub fn close_count(&self) -> usize {
        self.close_count
    }

    /// Returns true once `close` has been called
    pub fn is_closed(&self) -> bool {
        self.close_count > 0
    }

    /// Features not yet consumed
    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

impl FeatureCursor for VecCursor {
    type Item = MemoryFeature;

    fn has_next(&mut self) -> StoreResult<bool> {
        if self.is_closed() {
            return Err(StoreError::QueryFailed("cursor is closed".into()));
        }
        Ok(!self.items.is_empty())
    }

    fn next(&mut self) -> StoreResult<MemoryFeature> {
        if self.is_closed() {
            return Err(StoreError::QueryFailed("cursor is closed".into()));
        }
        self.items
            .pop_front()
            .unwrap_or_else(|| Err(StoreError::QueryFailed("cursor is exhausted".into())))
    }

    fn close(&mut self) {
        self.items.clear();
        self.close_count += 1;
    }
}

#[derive(Debug, Clone, Default)]
struct FixtureType {
    fields: FieldTypes,
    responses: HashMap<String, Vec<MemoryFeature>>,
}

/// A store that replays registered responses keyed by filter text
#[derive(Debug, Clone, Default)]
pub struct FixtureStore {
    types: BTreeMap<String, FixtureType>,
}

impl FixtureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a feature type and its fields
    pub fn register_type(&mut self, type_name: impl Into<String>, fields: FieldTypes) {
        self.types.insert(
            type_name.into(),
            FixtureType {
                fields,
                responses: HashMap::new(),
            },
        );
    }

    /// Register the features returned for a filter
    pub fn respond(
        &mut self,
        type_name: &str,
        filter: &FilterExpr,
        features: Vec<MemoryFeature>,
    ) -> StoreResult<()> {
        let entry = self
            .types
            .get_mut(type_name)
            .ok_or_else(|| StoreError::UnknownType(type_name.to_string()))?;
        entry
            .responses
            .insert(filter.as_str().to_string(), features);
        Ok(())
    }
}

impl FeatureStore for FixtureStore {
    type Cursor = VecCursor;

    fn type_names(&self) -> Vec<String> {
        self.types.keys().cloned().collect()
    }

    fn field_types(&self, type_name: &str) -> StoreResult<FieldTypes> {
        self.types
            .get(type_name)
            .map(|t| t.fields.clone())
            .ok_or_else(|| StoreError::UnknownType(type_name.to_string()))
    }

    fn get_features(&self, type_name: &str, filter: &FilterExpr) -> StoreResult<VecCursor> {
        let entry = self
            .types
            .get(type_name)
            .ok_or_else(|| StoreError::UnknownType(type_name.to_string()))?;
        let features = entry.responses.get(filter.as_str()).ok_or_else(|| {
            StoreError::QueryFailed(format!("no response registered for filter '{}'", filter))
        })?;
        Ok(VecCursor::new(features.iter().cloned()))
    }
}

//! Field type definitions
//!
//! Supported types:
//! - date: timestamp, rendered in the store's native text form
//! - double: 64-bit floating point
//! - float: 32-bit floating point
//! - integer: 32-bit signed integer
//! - long: 64-bit signed integer
//! - point: 2D point geometry
//! - string: UTF-8 string

use std::fmt;
use std::str::FromStr;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The closed set of attribute types the projector converts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Date,
    Double,
    Float,
    Integer,
    Long,
    Point,
    String,
}

impl FieldType {
    /// Every supported type, in tag order
    pub const ALL: [FieldType; 7] = [
        FieldType::Date,
        FieldType::Double,
        FieldType::Float,
        FieldType::Integer,
        FieldType::Long,
        FieldType::Point,
        FieldType::String,
    ];

    /// Returns the lowercase tag
    pub fn tag(&self) -> &'static str {
        match self {
            FieldType::Date => "date",
            FieldType::Double => "double",
            FieldType::Float => "float",
            FieldType::Integer => "integer",
            FieldType::Long => "long",
            FieldType::Point => "point",
            FieldType::String => "string",
        }
    }

    /// Resolve a type tag, ignoring case.
    ///
    /// Fully qualified class names such as `java.lang.Long` resolve by their
    /// last segment.
    pub fn from_tag(tag: &str) -> Option<FieldType> {
        let tag = tag.trim();
        let simple = tag.rsplit('.').next().unwrap_or(tag);
        FieldType::ALL
            .into_iter()
            .find(|t| t.tag().eq_ignore_ascii_case(simple))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Error returned when a tag is outside the supported set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFieldType(pub String);

impl fmt::Display for UnknownFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field type '{}'", self.0)
    }
}

impl std::error::Error for UnknownFieldType {}

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::from_tag(s).ok_or_else(|| UnknownFieldType(s.to_string()))
    }
}

/// One attribute as described by the store's schema.
///
/// The type is kept as the store reported it so unsupported tags surface
/// when a projection starts rather than when the schema is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Type tag as reported by the store
    #[serde(rename = "type")]
    pub type_name: String,
    /// Whether the attribute may be null
    #[serde(default = "default_nillable")]
    pub nillable: bool,
    /// Default value declared by the store, if any
    #[serde(default)]
    pub default: Option<serde_json::Value>,
}

fn default_nillable() -> bool {
    true
}

impl FieldDescriptor {
    /// Create a nillable descriptor with no default
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            nillable: true,
            default: None,
        }
    }

    /// Create a descriptor for a known type
    pub fn of(field_type: FieldType) -> Self {
        Self::new(field_type.tag())
    }

    /// Set the nillable flag
    pub fn with_nillable(mut self, nillable: bool) -> Self {
        self.nillable = nillable;
        self
    }

    /// Set the declared default
    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Resolve the type tag
    pub fn field_type(&self) -> Option<FieldType> {
        FieldType::from_tag(&self.type_name)
    }
}

/// Field name to descriptor, in declaration order.
///
/// The order here is the column order of every projected record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldTypes {
    entries: Vec<(String, FieldDescriptor)>,
}

impl FieldTypes {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field. A replaced field keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, descriptor: FieldDescriptor) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, d)) => *d = descriptor,
            None => self.entries.push((name, descriptor)),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.insert(name, descriptor);
        self
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    /// Returns true if the field is declared
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate fields in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.entries.iter().map(|(n, d)| (n.as_str(), d))
    }

    /// Field names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, FieldDescriptor)> for FieldTypes {
    fn from_iter<I: IntoIterator<Item = (N, FieldDescriptor)>>(iter: I) -> Self {
        let mut types = FieldTypes::new();
        for (name, descriptor) in iter {
            types.insert(name, descriptor);
        }
        types
    }
}

impl Serialize for FieldTypes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, descriptor) in &self.entries {
            map.serialize_entry(name, descriptor)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldTypes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldTypesVisitor;

        impl<'de> Visitor<'de> for FieldTypesVisitor {
            type Value = FieldTypes;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field name to field descriptor")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FieldTypes, A::Error> {
                let mut types = FieldTypes::new();
                while let Some((name, descriptor)) =
                    access.next_entry::<String, FieldDescriptor>()?
                {
                    types.insert(name, descriptor);
                }
                Ok(types)
            }
        }

        deserializer.deserialize_map(FieldTypesVisitor)
    }
}

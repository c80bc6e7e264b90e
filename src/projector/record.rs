//! Projected records and their values

use std::fmt;

use chrono::NaiveDateTime;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::feature::Geometry;

/// A point attribute.
///
/// The source geometry is retained for callers that need it, but only the
/// coordinates take part in equality and serialization.
#[derive(Debug, Clone)]
pub struct PointValue {
    pub x: f64,
    pub y: f64,
    pub geometry: Option<Geometry>,
}

impl PointValue {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, geometry: None }
    }
}

impl PartialEq for PointValue {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Serialize for PointValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("PointValue", 2)?;
        s.serialize_field("x", &self.x)?;
        s.serialize_field("y", &self.y)?;
        s.end()
    }
}

impl fmt::Display for PointValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "POINT ({} {})", self.x, self.y)
    }
}

/// A date attribute in the store's native text form, e.g.
/// `Fri Jul 04 12:00:00 UTC 2014`, plus the parsed instant when the text
/// could be read back.
#[derive(Debug, Clone, PartialEq)]
pub struct DateValue {
    pub raw: String,
    pub parsed: Option<NaiveDateTime>,
}

impl Serialize for DateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// A converted attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Date(DateValue),
    Double(f64),
    Float(f32),
    Integer(i32),
    Long(i64),
    Point(PointValue),
    String(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_point(&self) -> Option<&PointValue> {
        match self {
            FieldValue::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateValue> {
        match self {
            FieldValue::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_unit(),
            FieldValue::Date(d) => d.serialize(serializer),
            FieldValue::Double(v) => serializer.serialize_f64(*v),
            FieldValue::Float(v) => serializer.serialize_f32(*v),
            FieldValue::Integer(v) => serializer.serialize_i32(*v),
            FieldValue::Long(v) => serializer.serialize_i64(*v),
            FieldValue::Point(p) => p.serialize(serializer),
            FieldValue::String(s) => serializer.serialize_str(s),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Date(d) => d.fmt(f),
            FieldValue::Double(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Long(v) => write!(f, "{}", v),
            FieldValue::Point(p) => p.fmt(f),
            FieldValue::String(s) => f.write_str(s),
        }
    }
}

/// One projected feature: field values in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Append a field
    pub fn push(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.push((name.into(), value));
    }

    /// Look up a field value by name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Look up a field value ignoring ASCII case
    pub fn get_ignore_case(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Iterate fields in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Field names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Records in cursor order, addressed by 1-based position
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    records: Vec<Record>,
}

impl ResultSet {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at 1-based position `n`
    pub fn get(&self, n: usize) -> Option<&Record> {
        n.checked_sub(1).and_then(|i| self.records.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Iterate `(n, record)` with 1-based `n`
    pub fn iter_numbered(&self) -> impl Iterator<Item = (usize, &Record)> {
        self.records.iter().enumerate().map(|(i, r)| (i + 1, r))
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl IntoIterator for ResultSet {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Record {
        let mut record = Record::new();
        record.push("Who", FieldValue::String("Bierce".into()));
        record.push("What", FieldValue::Long(7));
        record.push(
            "When",
            FieldValue::Date(DateValue {
                raw: "Fri Jul 04 12:00:00 UTC 2014".into(),
                parsed: None,
            }),
        );
        record.push(
            "Where",
            FieldValue::Point(PointValue {
                x: -77.25,
                y: -37.0,
                geometry: Some(Geometry::Point { x: -77.25, y: -37.0 }),
            }),
        );
        record.push("Why", FieldValue::Null);
        record
    }

    #[test]
    fn test_record_serializes_in_order() {
        let text = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            text,
            r#"{"Who":"Bierce","What":7,"When":"Fri Jul 04 12:00:00 UTC 2014","Where":{"x":-77.25,"y":-37.0},"Why":null}"#
        );
    }

    #[test]
    fn test_record_lookup() {
        let record = sample();
        assert_eq!(record.len(), 5);
        assert_eq!(record.get("What"), Some(&FieldValue::Long(7)));
        assert_eq!(record.get_ignore_case("who").and_then(|v| v.as_str()), Some("Bierce"));
        assert!(record.get("Missing").is_none());
    }

    #[test]
    fn test_point_equality_ignores_geometry() {
        let a = PointValue::new(1.0, 2.0);
        let b = PointValue {
            x: 1.0,
            y: 2.0,
            geometry: Some(Geometry::Point { x: 1.0, y: 2.0 }),
        };
        assert_eq!(a, b);
        assert_eq!(serde_json::to_value(&b).unwrap(), json!({"x": 1.0, "y": 2.0}));
    }

    #[test]
    fn test_display() {
        let record = sample();
        assert_eq!(record.get("Where").unwrap().to_string(), "POINT (-77.25 -37)");
        assert_eq!(record.get("Why").unwrap().to_string(), "null");
    }

    #[test]
    fn test_result_set_is_one_based() {
        let set = ResultSet::new(vec![sample(), Record::new()]);
        assert!(set.get(0).is_none());
        assert_eq!(set.get(1), Some(&sample()));
        assert!(set.get(3).is_none());

        let numbers: Vec<_> = set.iter_numbered().map(|(n, _)| n).collect();
        assert_eq!(numbers, vec![1, 2]);
    }
}

//! Cursor over features exported as JSON lines
//!
//! Each non-blank line is one flat JSON object keyed by attribute name. An
//! optional `fid` key carries the feature id. Values are decoded using the
//! declared field types:
//!
//! - date: RFC 3339 text or epoch milliseconds; other text is kept as-is
//! - point: `POINT (x y)` WKT or an `{"x":..,"y":..}` object
//! - integer, long, float, double: JSON numbers
//! - string: JSON strings
//!
//! Values that do not fit their declared type are decoded generically and
//! left for the projector to reject.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::schema::{FieldType, FieldTypes};

use super::errors::{StoreError, StoreResult};
use super::memory::MemoryFeature;
use super::traits::FeatureCursor;
use super::value::{Geometry, RawValue};

/// Key holding the feature id
pub const FID_KEY: &str = "fid";

/// Reads features lazily from a JSON-lines source
pub struct JsonLinesCursor<R> {
    lines: Lines<R>,
    fields: FieldTypes,
    line_no: usize,
    pending: Option<MemoryFeature>,
    closed: bool,
}

impl JsonLinesCursor<BufReader<File>> {
    /// Open a JSON-lines file
    pub fn open(path: &Path, fields: &FieldTypes) -> StoreResult<Self> {
        let file = File::open(path)
            .map_err(|e| StoreError::Io(format!("{}: {}", path.display(), e)))?;
        Ok(Self::new(BufReader::new(file), fields))
    }
}

impl<R: BufRead> JsonLinesCursor<R> {
    /// Create a cursor over any buffered reader
    pub fn new(reader: R, fields: &FieldTypes) -> Self {
        Self {
            lines: reader.lines(),
            fields: fields.clone(),
            line_no: 0,
            pending: None,
            closed: false,
        }
    }

    /// Number of lines read so far
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    fn decode_line(&self, line: &str) -> StoreResult<MemoryFeature> {
        let value: Value = serde_json::from_str(line).map_err(|e| StoreError::Decode {
            line: self.line_no,
            reason: e.to_string(),
        })?;
        let object = match value {
            Value::Object(map) => map,
            other => {
                return Err(StoreError::Decode {
                    line: self.line_no,
                    reason: format!("expected an object, found {}", json_kind(&other)),
                })
            }
        };

        self.decode_object(object)
    }

    fn decode_object(&self, object: Map<String, Value>) -> StoreResult<MemoryFeature> {
        let mut feature = match object.get(FID_KEY) {
            Some(Value::String(id)) => MemoryFeature::with_id(id.clone()),
            _ => MemoryFeature::new(),
        };

        for (name, value) in object {
            if name == FID_KEY && !self.fields.contains(FID_KEY) {
                continue;
            }
            let declared = self.fields.get(&name).and_then(|d| d.field_type());
            let raw = decode_value(declared, &value).map_err(|reason| StoreError::Decode {
                line: self.line_no,
                reason: format!("field '{}': {}", name, reason),
            })?;
            feature = feature.set(name, raw);
        }

        Ok(feature)
    }
}

impl<R: BufRead> FeatureCursor for JsonLinesCursor<R> {
    type Item = MemoryFeature;

    fn has_next(&mut self) -> StoreResult<bool> {
        if self.closed {
            return Err(StoreError::QueryFailed("cursor is closed".into()));
        }
        if self.pending.is_some() {
            return Ok(true);
        }

        loop {
            let line = match self.lines.next() {
                Some(line) => line?,
                None => return Ok(false),
            };
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            let feature = self.decode_line(&line)?;
            self.pending = Some(feature);
            return Ok(true);
        }
    }

    fn next(&mut self) -> StoreResult<MemoryFeature> {
        if !self.has_next()? {
            return Err(StoreError::QueryFailed("cursor is exhausted".into()));
        }
        self.pending
            .take()
            .ok_or_else(|| StoreError::QueryFailed("cursor is exhausted".into()))
    }

    fn close(&mut self) {
        self.pending = None;
        self.closed = true;
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn decode_value(declared: Option<FieldType>, value: &Value) -> Result<RawValue, String> {
    if value.is_null() {
        return Ok(RawValue::Null);
    }

    let typed = match (declared, value) {
        (Some(FieldType::Date), Value::String(s)) => Some(
            DateTime::parse_from_rfc3339(s)
                .map(|dt| RawValue::Timestamp(dt.with_timezone(&Utc)))
                .unwrap_or_else(|_| RawValue::Text(s.clone())),
        ),
        (Some(FieldType::Date), Value::Number(n)) => match n.as_i64() {
            Some(millis) => match Utc.timestamp_millis_opt(millis).single() {
                Some(dt) => Some(RawValue::Timestamp(dt)),
                None => return Err(format!("epoch millis out of range: {}", millis)),
            },
            None => None,
        },
        (Some(FieldType::Point), Value::String(s)) => Some(RawValue::Geometry(Geometry::from_wkt(s))),
        (Some(FieldType::Point), Value::Object(map)) => {
            let x = map.get("x").and_then(Value::as_f64);
            let y = map.get("y").and_then(Value::as_f64);
            match (x, y) {
                (Some(x), Some(y)) => Some(RawValue::point(x, y)),
                _ => return Err("point object needs numeric x and y".to_string()),
            }
        }
        (Some(FieldType::Integer), Value::Number(n)) => n
            .as_i64()
            .and_then(|i| i32::try_from(i).ok())
            .map(RawValue::Int),
        (Some(FieldType::Long), Value::Number(n)) => n.as_i64().map(RawValue::Long),
        (Some(FieldType::Float), Value::Number(n)) => n
            .as_f64()
            .filter(|f| (*f as f32).is_finite())
            .map(|f| RawValue::Float(f as f32)),
        (Some(FieldType::Double), Value::Number(n)) => n.as_f64().map(RawValue::Double),
        _ => None,
    };

    Ok(typed.unwrap_or_else(|| decode_generic(value)))
}

fn decode_generic(value: &Value) -> RawValue {
    match value {
        Value::Null => RawValue::Null,
        Value::Bool(b) => RawValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => RawValue::Long(i),
            None => RawValue::Double(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => RawValue::Text(s.clone()),
        other => RawValue::Text(other.to_string()),
    }
}

//! Raw attribute values as a store hands them back

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

/// A geometry attribute
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// 2D point
    Point { x: f64, y: f64 },
    /// Any other geometry, kept as WKT
    Wkt(String),
}

fn point_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^\s*POINT\s*\(\s*([-+0-9.eE]+)\s+([-+0-9.eE]+)\s*\)\s*$")
            .expect("point pattern is valid")
    })
}

impl Geometry {
    /// Parse WKT. `POINT (x y)` becomes a point, everything else is kept as text.
    pub fn from_wkt(wkt: &str) -> Geometry {
        point_pattern()
            .captures(wkt)
            .and_then(|c| {
                let x = c.get(1)?.as_str().parse::<f64>().ok()?;
                let y = c.get(2)?.as_str().parse::<f64>().ok()?;
                Some(Geometry::Point { x, y })
            })
            .unwrap_or_else(|| Geometry::Wkt(wkt.trim().to_string()))
    }

    /// Coordinates, if this is a point
    pub fn as_point(&self) -> Option<(f64, f64)> {
        match self {
            Geometry::Point { x, y } => Some((*x, *y)),
            Geometry::Wkt(_) => None,
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Geometry::Point { x, y } => write!(f, "POINT ({} {})", x, y),
            Geometry::Wkt(wkt) => f.write_str(wkt),
        }
    }
}

/// One property value read from a feature
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Geometry(Geometry),
}

impl RawValue {
    /// Short kind name for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Bool(_) => "bool",
            RawValue::Int(_) => "int",
            RawValue::Long(_) => "long",
            RawValue::Float(_) => "float",
            RawValue::Double(_) => "double",
            RawValue::Text(_) => "text",
            RawValue::Timestamp(_) => "timestamp",
            RawValue::Geometry(_) => "geometry",
        }
    }

    /// A point value
    pub fn point(x: f64, y: f64) -> Self {
        RawValue::Geometry(Geometry::Point { x, y })
    }

    /// A text value
    pub fn text(s: impl Into<String>) -> Self {
        RawValue::Text(s.into())
    }
}

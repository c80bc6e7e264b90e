//! Per-type value conversion
//!
//! One exhaustive match over [`FieldType`]. Null passes through for every
//! type; widening (int to long, float to double) is allowed, narrowing is
//! not.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::feature::{Geometry, RawValue};
use crate::schema::FieldType;

use super::errors::{ProjectorError, ProjectorResult};
use super::record::{DateValue, FieldValue, PointValue};

/// Text form the store uses for dates: `Dow Mon DD HH:MM:SS TZ YYYY`
pub const NATIVE_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %Z %Y";

// Same layout without the zone token, which chrono cannot parse by name
const NATIVE_DATE_PARSE_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// Render a timestamp in the store's native text form
pub fn format_native_date(dt: &DateTime<Utc>) -> String {
    dt.format(NATIVE_DATE_FORMAT).to_string()
}

/// Parse the store's native date text back into a naive timestamp.
///
/// The zone token is skipped; the result is in whatever zone the text was.
pub fn parse_native_date(text: &str) -> Option<NaiveDateTime> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() != 6 {
        return None;
    }
    let without_zone = format!(
        "{} {} {} {} {}",
        tokens[0], tokens[1], tokens[2], tokens[3], tokens[5]
    );
    NaiveDateTime::parse_from_str(&without_zone, NATIVE_DATE_PARSE_FORMAT).ok()
}

/// Convert one raw property value to its declared type
pub fn convert_value(
    field: &str,
    field_type: FieldType,
    raw: RawValue,
    index: usize,
) -> ProjectorResult<FieldValue> {
    if let RawValue::Null = raw {
        return Ok(FieldValue::Null);
    }

    let found = raw.kind();
    let converted = match field_type {
        FieldType::Date => match raw {
            RawValue::Timestamp(dt) => Some(FieldValue::Date(DateValue {
                raw: format_native_date(&dt),
                parsed: Some(dt.naive_utc()),
            })),
            RawValue::Text(text) => {
                let parsed = parse_native_date(&text);
                Some(FieldValue::Date(DateValue { raw: text, parsed }))
            }
            _ => None,
        },
        FieldType::Double => match raw {
            RawValue::Double(v) => Some(FieldValue::Double(v)),
            RawValue::Float(v) => Some(FieldValue::Double(f64::from(v))),
            _ => None,
        },
        FieldType::Float => match raw {
            RawValue::Float(v) => Some(FieldValue::Float(v)),
            _ => None,
        },
        FieldType::Integer => match raw {
            RawValue::Int(v) => Some(FieldValue::Integer(v)),
            _ => None,
        },
        FieldType::Long => match raw {
            RawValue::Long(v) => Some(FieldValue::Long(v)),
            RawValue::Int(v) => Some(FieldValue::Long(i64::from(v))),
            _ => None,
        },
        FieldType::Point => match raw {
            RawValue::Geometry(geometry) => point_value(geometry),
            RawValue::Text(wkt) => point_value(Geometry::from_wkt(&wkt)),
            _ => None,
        },
        FieldType::String => match raw {
            RawValue::Text(s) => Some(FieldValue::String(s)),
            RawValue::Bool(b) => Some(FieldValue::String(b.to_string())),
            _ => None,
        },
    };

    converted.ok_or_else(|| ProjectorError::TypeMismatch {
        field: field.to_string(),
        field_type,
        found,
        index,
    })
}

fn point_value(geometry: Geometry) -> Option<FieldValue> {
    let (x, y) = geometry.as_point()?;
    Some(FieldValue::Point(PointValue {
        x,
        y,
        geometry: Some(geometry),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_from_timestamp() {
        let dt = Utc.with_ymd_and_hms(2014, 7, 4, 12, 0, 0).unwrap();
        let value = convert_value("When", FieldType::Date, RawValue::Timestamp(dt), 1).unwrap();

        let date = value.as_date().unwrap();
        assert_eq!(date.raw, "Fri Jul 04 12:00:00 UTC 2014");
        assert_eq!(date.parsed, Some(dt.naive_utc()));
        assert_eq!(parse_native_date(&date.raw), Some(dt.naive_utc()));
    }

    #[test]
    fn test_date_from_native_text() {
        let value = convert_value(
            "When",
            FieldType::Date,
            RawValue::text("Tue Sep 30 23:59:59 EDT 2014"),
            1,
        )
        .unwrap();
        let date = value.as_date().unwrap();
        assert_eq!(date.raw, "Tue Sep 30 23:59:59 EDT 2014");
        assert_eq!(
            date.parsed.unwrap().to_string(),
            "2014-09-30 23:59:59"
        );
    }

    #[test]
    fn test_date_unparseable_text_kept() {
        let value = convert_value("When", FieldType::Date, RawValue::text("soon"), 1).unwrap();
        let date = value.as_date().unwrap();
        assert_eq!(date.raw, "soon");
        assert!(date.parsed.is_none());
    }

    #[test]
    fn test_point() {
        let value = convert_value("Where", FieldType::Point, RawValue::point(1.0, 2.0), 1).unwrap();
        assert_eq!(value, FieldValue::Point(PointValue::new(1.0, 2.0)));

        let value = convert_value("Where", FieldType::Point, RawValue::text("POINT (3 4)"), 1).unwrap();
        assert_eq!(value, FieldValue::Point(PointValue::new(3.0, 4.0)));
    }

    #[test]
    fn test_non_point_geometry_rejected() {
        let raw = RawValue::Geometry(Geometry::Wkt("LINESTRING (0 0, 1 1)".into()));
        let err = convert_value("Where", FieldType::Point, raw, 4).unwrap_err();
        assert_eq!(err.code(), "GEO_TYPE_MISMATCH");
        assert_eq!(err.index(), Some(4));
    }

    #[test]
    fn test_widening() {
        assert_eq!(
            convert_value("What", FieldType::Long, RawValue::Int(5), 1).unwrap(),
            FieldValue::Long(5)
        );
        assert_eq!(
            convert_value("Score", FieldType::Double, RawValue::Float(0.5), 1).unwrap(),
            FieldValue::Double(0.5)
        );
    }

    #[test]
    fn test_no_narrowing() {
        assert!(convert_value("What", FieldType::Integer, RawValue::Long(5), 1).is_err());
        assert!(convert_value("Score", FieldType::Float, RawValue::Double(0.5), 1).is_err());
    }

    #[test]
    fn test_null_passes_for_every_type() {
        for ty in FieldType::ALL {
            assert_eq!(convert_value("f", ty, RawValue::Null, 1).unwrap(), FieldValue::Null);
        }
    }

    #[test]
    fn test_string_mismatch_reports_kind() {
        match convert_value("Who", FieldType::String, RawValue::Long(1), 2) {
            Err(ProjectorError::TypeMismatch { found, field_type, .. }) => {
                assert_eq!(found, "long");
                assert_eq!(field_type, FieldType::String);
            }
            other => panic!("expected mismatch, got {:?}", other),
        }
    }
}

//! ECQL fragment builders
//!
//! Each function renders one standalone predicate. Spatial and temporal
//! bounds are checked before rendering; WKT and attribute expressions are
//! passed through untouched and only the store will reject them.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDateTime};
use regex::Regex;

use super::errors::{FilterError, FilterResult};
use super::expr::FilterExpr;

/// Bounding-box containment over a rectangular extent.
///
/// Renders `BBOX(field, x0, y0, x1, y1)`. Coordinates are never reordered,
/// so an inverted or non-finite extent is rejected instead.
pub fn bbox_filter(field: &str, x0: f64, y0: f64, x1: f64, y1: f64) -> FilterResult<FilterExpr> {
    for (name, v) in [("x0", x0), ("y0", y0), ("x1", x1), ("y1", y1)] {
        if !v.is_finite() {
            return Err(FilterError::invalid_range(
                field,
                format!("{} is not a finite coordinate: {}", name, v),
            ));
        }
    }
    if x0 > x1 {
        return Err(FilterError::invalid_range(
            field,
            format!("x0 ({}) is greater than x1 ({})", x0, x1),
        ));
    }
    if y0 > y1 {
        return Err(FilterError::invalid_range(
            field,
            format!("y0 ({}) is greater than y1 ({})", y0, y1),
        ));
    }

    Ok(FilterExpr::new(format!(
        "BBOX({}, {}, {}, {}, {})",
        field, x0, y0, x1, y1
    )))
}

/// Containment within a polygon or multipolygon given as WKT
pub fn within_filter(field: &str, wkt: &str) -> FilterExpr {
    FilterExpr::new(format!("WITHIN({}, {})", field, wkt))
}

/// Temporal range `(field DURING t0/t1)`, bounds rendered exactly as given.
///
/// Each bound is an ISO-8601 instant (with or without a zone offset) or an
/// ISO-8601 duration such as `P10D`, but not both sides durations. When both
/// sides are instants, `t0` must not come after `t1`. Zone-less instants are
/// read as UTC for that comparison.
pub fn during_filter(field: &str, t0: &str, t1: &str) -> FilterResult<FilterExpr> {
    let start = parse_bound(t0).ok_or_else(|| {
        FilterError::invalid_range(
            field,
            format!("start '{}' is neither an ISO-8601 instant nor a duration", t0),
        )
    })?;
    let end = parse_bound(t1).ok_or_else(|| {
        FilterError::invalid_range(
            field,
            format!("end '{}' is neither an ISO-8601 instant nor a duration", t1),
        )
    })?;

    match (start, end) {
        (Bound::Instant(a), Bound::Instant(b)) if a > b => {
            return Err(FilterError::invalid_range(
                field,
                format!("start '{}' is after end '{}'", t0, t1),
            ));
        }
        (Bound::Duration, Bound::Duration) => {
            return Err(FilterError::invalid_range(
                field,
                format!("'{}/{}' has no instant to anchor the period", t0, t1),
            ));
        }
        _ => {}
    }

    Ok(FilterExpr::new(format!("({} DURING {}/{})", field, t0, t1)))
}

/// One side of a DURING period
#[derive(Debug, Clone, Copy, PartialEq)]
enum Bound {
    /// A point in time, normalized to UTC
    Instant(NaiveDateTime),
    /// A length of time relative to the other side
    Duration,
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"];

fn parse_bound(text: &str) -> Option<Bound> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(Bound::Instant(dt.naive_utc()));
    }
    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
    {
        return Some(Bound::Instant(dt));
    }
    if is_iso_duration(text) {
        return Some(Bound::Duration);
    }
    None
}

fn duration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^P(?:\d+Y)?(?:\d+M)?(?:\d+W)?(?:\d+D)?(?:T(?:\d+H)?(?:\d+M)?(?:\d+(?:[.,]\d+)?S)?)?$",
        )
        .expect("duration pattern is valid")
    })
}

/// `PnYnMnWnDTnHnMnS` with at least one component and nothing dangling after `T`
fn is_iso_duration(text: &str) -> bool {
    duration_pattern().is_match(text)
        && text.len() > 1
        && !text.ends_with('T')
        && text.chars().any(|c| c.is_ascii_digit())
}

/// A freeform attribute predicate, or `INCLUDE` when there is none
pub fn attribute_filter(expr: Option<&str>) -> FilterExpr {
    match expr {
        Some(e) => FilterExpr::new(e),
        None => FilterExpr::include(),
    }
}

/// Join fragments with `AND`.
///
/// Fragments are used verbatim; a fragment with a top-level `OR` will bind
/// looser than the surrounding `AND`s. Use [`combine_grouped`] when that
/// matters. No fragments yields `INCLUDE`.
pub fn combine<I, T>(fragments: I) -> FilterExpr
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let parts: Vec<String> = fragments
        .into_iter()
        .map(|f| f.as_ref().to_string())
        .collect();
    if parts.is_empty() {
        return FilterExpr::include();
    }
    FilterExpr::new(parts.join(" AND "))
}

/// Join fragments with `AND`, parenthesizing each one that is not already
/// wrapped in a single outer pair of parentheses.
pub fn combine_grouped<I, T>(fragments: I) -> FilterExpr
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    combine(fragments.into_iter().map(|f| {
        let text = f.as_ref().trim();
        if is_enclosed(text) {
            text.to_string()
        } else {
            format!("({})", text)
        }
    }))
}

/// True when the first `(` closes on the last character.
///
/// Parentheses inside single-quoted literals are ignored.
fn is_enclosed(text: &str) -> bool {
    if !text.starts_with('(') || !text.ends_with(')') {
        return false;
    }

    let mut depth = 0usize;
    let mut in_literal = false;
    let last = text.len() - 1;

    for (i, c) in text.char_indices() {
        match c {
            '\'' => in_literal = !in_literal,
            '(' if !in_literal => depth += 1,
            ')' if !in_literal => {
                depth = depth.saturating_sub(1);
                if depth == 0 && i != last {
                    return false;
                }
            }
            _ => {}
        }
    }

    depth == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quickstart_filter() {
        let combined = combine([
            bbox_filter("Where", -77.5, -37.5, -76.5, -36.5).unwrap(),
            during_filter("When", "2014-07-01T00:00:00.000Z", "2014-09-30T23:59:59.999Z").unwrap(),
            attribute_filter(Some("(Who = 'Bierce')")),
        ]);

        assert_eq!(
            combined,
            "BBOX(Where, -77.5, -37.5, -76.5, -36.5) AND (When DURING 2014-07-01T00:00:00.000Z/2014-09-30T23:59:59.999Z) AND (Who = 'Bierce')"
        );
    }

    #[test]
    fn test_attribute_filter_none_is_include() {
        assert_eq!(attribute_filter(None), "INCLUDE");
    }

    #[test]
    fn test_bbox_is_stable() {
        let a = bbox_filter("Where", 1.0, 2.0, 3.0, 4.0).unwrap();
        let b = bbox_filter("Where", 1.0, 2.0, 3.0, 4.0).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, "BBOX(Where, 1, 2, 3, 4)");
    }

    #[test]
    fn test_bbox_degenerate_allowed() {
        let f = bbox_filter("Where", 5.0, 5.0, 5.0, 5.0).unwrap();
        assert_eq!(f, "BBOX(Where, 5, 5, 5, 5)");
    }

    #[test]
    fn test_bbox_inverted_rejected() {
        let err = bbox_filter("Where", 3.0, 2.0, 1.0, 4.0).unwrap_err();
        assert_eq!(err.code(), "GEO_INVALID_RANGE");
        assert!(err.to_string().contains("x0"));

        let err = bbox_filter("Where", 1.0, 4.0, 3.0, 2.0).unwrap_err();
        assert!(err.to_string().contains("y0"));
    }

    #[test]
    fn test_bbox_non_finite_rejected() {
        assert!(bbox_filter("Where", f64::NAN, 0.0, 1.0, 1.0).is_err());
        assert!(bbox_filter("Where", 0.0, 0.0, f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_within_passes_wkt_through() {
        let f = within_filter("Where", "POLYGON((0 0, 1 0, 1 1, 0 0))");
        assert_eq!(f, "WITHIN(Where, POLYGON((0 0, 1 0, 1 1, 0 0)))");
    }

    #[test]
    fn test_during_rejects_inverted() {
        let err = during_filter("When", "2014-09-30T00:00:00Z", "2014-07-01T00:00:00Z").unwrap_err();
        assert_eq!(err.field(), "When");
    }

    #[test]
    fn test_during_rejects_garbage() {
        assert!(during_filter("When", "yesterday", "2014-07-01T00:00:00Z").is_err());
        assert!(during_filter("When", "2014-07-01T00:00:00Z", "").is_err());
    }

    #[test]
    fn test_during_accepts_zoneless_instants() {
        let f = during_filter("When", "2014-07-01T00:00:00", "2014-09-30T23:59:59.999").unwrap();
        assert_eq!(f, "(When DURING 2014-07-01T00:00:00/2014-09-30T23:59:59.999)");

        assert!(during_filter("When", "2014-09-30T00:00:00", "2014-07-01T00:00:00").is_err());
    }

    #[test]
    fn test_during_accepts_durations() {
        let f = during_filter("When", "2014-07-01T00:00:00Z", "P10D").unwrap();
        assert_eq!(f, "(When DURING 2014-07-01T00:00:00Z/P10D)");

        let f = during_filter("When", "PT36H", "2014-07-01T00:00:00").unwrap();
        assert_eq!(f, "(When DURING PT36H/2014-07-01T00:00:00)");

        assert!(during_filter("When", "2014-07-01T00:00:00Z", "P1Y2M3DT4H5M6.5S").is_ok());
    }

    #[test]
    fn test_during_rejects_bad_durations() {
        assert!(during_filter("When", "P1D", "P2D").is_err());
        assert!(during_filter("When", "2014-07-01T00:00:00Z", "P").is_err());
        assert!(during_filter("When", "2014-07-01T00:00:00Z", "P1DT").is_err());
        assert!(during_filter("When", "2014-07-01T00:00:00Z", "10D").is_err());
    }

    #[test]
    fn test_mixed_zone_instants_compare_in_utc() {
        assert!(during_filter("When", "2014-07-01T02:00:00+02:00", "2014-07-01T00:00:00").is_ok());
        assert!(during_filter("When", "2014-07-01T03:00:00+02:00", "2014-07-01T00:00:00").is_err());
    }

    #[test]
    fn test_during_equal_bounds() {
        let f = during_filter("When", "2014-07-01T00:00:00Z", "2014-07-01T00:00:00Z").unwrap();
        assert_eq!(f, "(When DURING 2014-07-01T00:00:00Z/2014-07-01T00:00:00Z)");
    }

    #[test]
    fn test_combine_empty_is_include() {
        let empty: Vec<FilterExpr> = Vec::new();
        assert!(combine(empty).is_include());
    }

    #[test]
    fn test_combine_does_not_parenthesize() {
        let f = combine(["A = 1 OR B = 2", "C = 3"]);
        assert_eq!(f, "A = 1 OR B = 2 AND C = 3");
    }

    #[test]
    fn test_combine_grouped() {
        let f = combine_grouped(["A OR B", "(C)"]);
        assert_eq!(f, "(A OR B) AND (C)");
    }

    #[test]
    fn test_combine_grouped_wraps_split_parens() {
        // "(A) OR (B)" opens and closes twice, so it needs its own group
        let f = combine_grouped(["(A) OR (B)", "BBOX(Where, 1, 2, 3, 4)"]);
        assert_eq!(f, "((A) OR (B)) AND (BBOX(Where, 1, 2, 3, 4))");
    }

    #[test]
    fn test_enclosed_ignores_quoted_parens() {
        assert!(is_enclosed("(Who = ')(')"));
        assert!(!is_enclosed("Who = 'x'"));
    }
}

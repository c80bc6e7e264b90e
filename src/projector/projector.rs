//! Drains a feature cursor into typed records
//!
//! # Projection Flow (strict order)
//!
//! 1. Take the cursor into a guard (`Idle`)
//! 2. Resolve every field's type tag; an unknown tag aborts here
//! 3. Iterate (`Iterating`): for each feature, convert every declared field
//! 4. Close the cursor (`Done`), on success and on every error path
//!
//! Any error aborts the whole batch. Features are dropped as soon as their
//! record is built.

use crate::feature::{Feature, FeatureCursor, StoreError};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{FieldType, FieldTypes};

use super::convert::convert_value;
use super::errors::{ProjectorError, ProjectorResult};
use super::guard::CursorGuard;
use super::record::{Record, ResultSet};
use super::sink::RecordSink;

/// Converts query results into records using a field type map
pub struct ResultProjector;

impl ResultProjector {
    /// Project every feature into memory.
    ///
    /// The cursor is closed exactly once before this returns.
    pub fn project<C: FeatureCursor>(
        fields: &FieldTypes,
        cursor: &mut C,
    ) -> ProjectorResult<ResultSet> {
        let mut records = Vec::new();
        Self::drain(fields, cursor, &mut records)?;
        Ok(ResultSet::new(records))
    }

    /// Project every feature into a sink, returning the number written.
    ///
    /// The cursor is closed exactly once before this returns. Records already
    /// handed to the sink before a failure stay there.
    pub fn project_to_stream<C: FeatureCursor, S: RecordSink>(
        fields: &FieldTypes,
        cursor: &mut C,
        sink: &mut S,
    ) -> ProjectorResult<usize> {
        Self::drain(fields, cursor, sink)
    }

    /// Resolve type tags in declaration order
    pub fn resolve_columns(fields: &FieldTypes) -> ProjectorResult<Vec<(String, FieldType)>> {
        fields
            .iter()
            .map(|(name, descriptor)| {
                descriptor
                    .field_type()
                    .map(|ty| (name.to_string(), ty))
                    .ok_or_else(|| ProjectorError::UnsupportedFieldType {
                        field: name.to_string(),
                        type_tag: descriptor.type_name.clone(),
                    })
            })
            .collect()
    }

    /// Convert a single feature
    pub fn project_feature<F: Feature>(
        columns: &[(String, FieldType)],
        feature: &F,
        index: usize,
    ) -> ProjectorResult<Record> {
        let mut record = Record::with_capacity(columns.len());
        for (name, field_type) in columns {
            let raw = feature
                .property(name)
                .ok_or_else(|| ProjectorError::MissingProperty {
                    field: name.clone(),
                    index,
                })?;
            record.push(name.clone(), convert_value(name, *field_type, raw, index)?);
        }
        Ok(record)
    }

    fn drain<C: FeatureCursor, S: RecordSink + ?Sized>(
        fields: &FieldTypes,
        cursor: &mut C,
        sink: &mut S,
    ) -> ProjectorResult<usize> {
        let mut guard = CursorGuard::new(cursor);

        let field_count = fields.len().to_string();
        log_event_with_fields(Event::ProjectionStart, &[("fields", field_count.as_str())]);

        let result = Self::run(fields, &mut guard, sink);
        guard.finish();

        match &result {
            Ok(count) => {
                let count = count.to_string();
                log_event_with_fields(Event::ProjectionComplete, &[("records", count.as_str())]);
            }
            Err(e) => {
                let message = e.to_string();
                log_event_with_fields(
                    Event::ProjectionFailed,
                    &[("code", e.code()), ("message", message.as_str())],
                );
            }
        }

        result
    }

    fn run<C: FeatureCursor, S: RecordSink + ?Sized>(
        fields: &FieldTypes,
        guard: &mut CursorGuard<'_, C>,
        sink: &mut S,
    ) -> ProjectorResult<usize> {
        let columns = Self::resolve_columns(fields)?;
        guard.begin();

        let external = |consumed: usize| {
            move |source: StoreError| ProjectorError::ExternalQueryFailure { consumed, source }
        };

        let mut n = 0usize;
        while guard.has_next().map_err(external(n))? {
            let feature = guard.next().map_err(external(n))?;
            n += 1;
            let record = Self::project_feature(&columns, &feature, n)?;
            sink.write_record(n, &record)
                .map_err(|e| ProjectorError::Sink {
                    index: n,
                    reason: e.to_string(),
                })?;
        }

        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{MemoryFeature, RawValue, VecCursor};
    use crate::projector::{FieldValue, PointValue};
    use crate::schema::FieldDescriptor;
    use std::io;

    fn point_fields() -> FieldTypes {
        FieldTypes::new()
            .with("Who", FieldDescriptor::new("String"))
            .with("Where", FieldDescriptor::new("Point"))
    }

    fn point_feature(i: usize) -> MemoryFeature {
        MemoryFeature::with_id(format!("Observation.{}", i))
            .set("Who", RawValue::text(format!("who-{}", i)))
            .set("Where", RawValue::point(1.0, 2.0))
    }

    #[test]
    fn test_projects_all_features_and_closes_once() {
        let mut cursor = VecCursor::new((0..5).map(point_feature));
        let results = ResultProjector::project(&point_fields(), &mut cursor).unwrap();

        assert_eq!(results.len(), 5);
        assert_eq!(cursor.close_count(), 1);
        for record in results.iter() {
            assert_eq!(
                record.get("Where"),
                Some(&FieldValue::Point(PointValue::new(1.0, 2.0)))
            );
        }
        assert_eq!(
            results.get(1).unwrap().get("Who").unwrap().as_str(),
            Some("who-0")
        );
    }

    #[test]
    fn test_empty_cursor() {
        let mut cursor = VecCursor::new(vec![]);
        let results = ResultProjector::project(&point_fields(), &mut cursor).unwrap();
        assert!(results.is_empty());
        assert_eq!(cursor.close_count(), 1);
    }

    #[test]
    fn test_unsupported_type_aborts_before_iterating() {
        let fields = point_fields().with("Payload", FieldDescriptor::new("blob"));
        let mut cursor = VecCursor::new((0..3).map(point_feature));

        let err = ResultProjector::project(&fields, &mut cursor).unwrap_err();
        assert_eq!(
            err,
            ProjectorError::UnsupportedFieldType {
                field: "Payload".into(),
                type_tag: "blob".into(),
            }
        );
        assert_eq!(cursor.close_count(), 1);
    }

    #[test]
    fn test_missing_property_fails_fast() {
        let mut cursor = VecCursor::new(vec![
            point_feature(0),
            MemoryFeature::new().set("Who", RawValue::text("no-where")),
            point_feature(2),
        ]);

        let err = ResultProjector::project(&point_fields(), &mut cursor).unwrap_err();
        assert_eq!(
            err,
            ProjectorError::MissingProperty {
                field: "Where".into(),
                index: 2,
            }
        );
        assert_eq!(cursor.close_count(), 1);
    }

    #[test]
    fn test_cursor_failure_closes_cursor() {
        let mut cursor = VecCursor::new((0..2).map(point_feature)).with_failure("scan aborted");

        let err = ResultProjector::project(&point_fields(), &mut cursor).unwrap_err();
        match err {
            ProjectorError::ExternalQueryFailure { consumed, source } => {
                assert_eq!(consumed, 2);
                assert_eq!(source, StoreError::QueryFailed("scan aborted".into()));
            }
            other => panic!("expected external failure, got {:?}", other),
        }
        assert_eq!(cursor.close_count(), 1);
    }

    #[test]
    fn test_stream_counts_records() {
        let mut cursor = VecCursor::new((0..4).map(point_feature));
        let mut sink: Vec<Record> = Vec::new();

        let n = ResultProjector::project_to_stream(&point_fields(), &mut cursor, &mut sink).unwrap();
        assert_eq!(n, 4);
        assert_eq!(sink.len(), 4);
        assert_eq!(cursor.close_count(), 1);
    }

    struct FailingSink;

    impl RecordSink for FailingSink {
        fn write_record(&mut self, _index: usize, _record: &Record) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
    }

    #[test]
    fn test_sink_failure_closes_cursor() {
        let mut cursor = VecCursor::new((0..2).map(point_feature));
        let err = ResultProjector::project_to_stream(&point_fields(), &mut cursor, &mut FailingSink)
            .unwrap_err();
        assert_eq!(err.code(), "GEO_SINK_FAILED");
        assert_eq!(err.index(), Some(1));
        assert_eq!(cursor.close_count(), 1);
    }

    #[test]
    fn test_records_follow_field_order() {
        let fields = FieldTypes::new()
            .with("Where", FieldDescriptor::new("Point"))
            .with("Who", FieldDescriptor::new("String"));
        let mut cursor = VecCursor::new(vec![point_feature(0)]);

        let results = ResultProjector::project(&fields, &mut cursor).unwrap();
        let names: Vec<_> = results.get(1).unwrap().names().collect();
        assert_eq!(names, vec!["Where", "Who"]);
    }
}

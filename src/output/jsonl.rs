//! JSON-lines output: one JSON object per record

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::feature::FeatureCursor;
use crate::observability::{log_event_with_fields, Event};
use crate::projector::{Record, RecordSink, ResultProjector};
use crate::schema::FieldTypes;

use super::errors::{OutputError, OutputResult};

/// Writes each record as a single JSON line
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Records written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and return the underlying writer
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn write_record(&mut self, _index: usize, record: &Record) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }
}

/// Project a cursor straight into a JSON-lines file, returning the record count.
///
/// The file is created (or truncated) before the cursor is read. The cursor
/// is closed whether or not the projection succeeds.
pub fn write_json_lines<C: FeatureCursor>(
    path: &Path,
    fields: &FieldTypes,
    cursor: &mut C,
) -> OutputResult<usize> {
    let io_error = |e: io::Error| OutputError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    let file = match File::create(path) {
        Ok(file) => file,
        Err(e) => {
            cursor.close();
            return Err(io_error(e));
        }
    };

    let mut sink = JsonLinesSink::new(BufWriter::new(file));
    let count = ResultProjector::project_to_stream(fields, cursor, &mut sink)?;
    sink.finish().map_err(io_error)?;

    let path_text = path.display().to_string();
    let count_text = count.to_string();
    log_event_with_fields(
        Event::OutputWritten,
        &[("path", path_text.as_str()), ("records", count_text.as_str())],
    );

    Ok(count)
}

//! Destinations for streamed records

use std::io;

use super::record::Record;

/// Receives records one at a time as a projection produces them
pub trait RecordSink {
    /// Accept the record at 1-based position `index`
    fn write_record(&mut self, index: usize, record: &Record) -> io::Result<()>;
}

impl RecordSink for Vec<Record> {
    fn write_record(&mut self, _index: usize, record: &Record) -> io::Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn write_record(&mut self, index: usize, record: &Record) -> io::Result<()> {
        (**self).write_record(index, record)
    }
}

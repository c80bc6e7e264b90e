//! Pipe-delimited text tables

use std::io::{self, Write};

use crate::projector::{Record, ResultSet};

/// Column order of the quickstart demo feature type
pub const QUICKSTART_COLUMNS: [&str; 5] = ["Who", "What", "When", "Where", "Why"];

/// Write a result set as `N|field|field..` followed by one row per record.
///
/// Columns come from the first record. With a `limit`, only the first
/// `limit` records are written. Nothing is written for an empty set.
pub fn write_table<W: Write>(
    results: &ResultSet,
    writer: &mut W,
    limit: Option<usize>,
) -> io::Result<()> {
    let first = match results.get(1) {
        Some(record) => record,
        None => return Ok(()),
    };

    let columns: Vec<&str> = first.names().collect();
    writeln!(writer, "N|{}", columns.join("|"))?;

    let limit = limit.unwrap_or(usize::MAX);
    for (n, record) in results.iter_numbered().take(limit) {
        writeln!(writer, "{}|{}", n, row(record, &columns, false))?;
    }

    writer.flush()
}

/// Write the quickstart demo rows: `n.<TAB>who|what|when|where|why`.
///
/// No header line. Column lookup ignores case; a missing column renders empty.
pub fn write_quickstart<W: Write>(
    results: &ResultSet,
    writer: &mut W,
    limit: Option<usize>,
) -> io::Result<()> {
    for (n, record) in results.iter_numbered().take(limit.unwrap_or(usize::MAX)) {
        writeln!(writer, "{}.\t{}", n, row(record, &QUICKSTART_COLUMNS, true))?;
    }

    writer.flush()
}

fn row(record: &Record, columns: &[&str], ignore_case: bool) -> String {
    columns
        .iter()
        .map(|c| {
            let value = if ignore_case {
                record.get_ignore_case(c)
            } else {
                record.get(c)
            };
            value.map(|v| v.to_string()).unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join("|")
}

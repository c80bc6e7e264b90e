//! Result output: text tables for display, JSON lines for persistence

mod errors;
mod jsonl;
mod table;

pub use errors::{OutputError, OutputResult};
pub use jsonl::{write_json_lines, JsonLinesSink};
pub use table::{write_quickstart, write_table, QUICKSTART_COLUMNS};

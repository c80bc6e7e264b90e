//! CLI module for geoquick
//!
//! Provides command-line interface for:
//! - filter: Build an ECQL filter string
//! - schema: Parse a feature type spec into a field map
//! - project: Project exported features into records
//! - quickstart: Run the quickstart query and print the table

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{parse_bbox, parse_during, Cli, Command};
pub use commands::{quickstart_filter, run, run_command, FilterRequest, QUICKSTART_SPEC};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{open_input, write_json, write_line};

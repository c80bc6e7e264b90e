//! CLI argument definitions using clap
//!
//! Commands:
//! - geoquick filter [--bbox x0,y0,x1,y1] [--within <wkt>] [--during t0/t1] [--attr <ecql>]
//! - geoquick schema (--spec <sft-spec> | --file <path>)
//! - geoquick project --schema <spec-or-file> --input <path|-> [--out <path>] [--limit N]
//! - geoquick quickstart --input <path> [--config <path>] [--out <path>] [--no-print]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// geoquick - ECQL filters and typed result projection for GeoMesa feature stores
#[derive(Parser, Debug)]
#[command(name = "geoquick")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build an ECQL filter and print it
    Filter {
        /// Geometry attribute for --bbox and --within
        #[arg(long, default_value = "Where")]
        geom_field: String,

        /// Bounding box as x0,y0,x1,y1
        #[arg(long, value_parser = parse_bbox, allow_hyphen_values = true)]
        bbox: Option<[f64; 4]>,

        /// Polygon or multipolygon WKT the geometry must lie within
        #[arg(long)]
        within: Option<String>,

        /// Date attribute for --during
        #[arg(long, default_value = "When")]
        date_field: String,

        /// Time range as t0/t1 (ISO-8601)
        #[arg(long, value_parser = parse_during)]
        during: Option<(String, String)>,

        /// Freeform attribute predicate
        #[arg(long)]
        attr: Option<String>,

        /// Parenthesize each fragment before joining
        #[arg(long)]
        grouped: bool,
    },

    /// Parse a feature type spec and print its field map as JSON
    Schema {
        /// SimpleFeatureType spec, e.g. "Who:String,*Where:Point:srid=4326"
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        spec: Option<String>,

        /// Schema file (.json field map or spec text)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Project exported features into records
    Project {
        /// Spec string, or a path to a schema file
        #[arg(long)]
        schema: String,

        /// Features as JSON lines ("-" for stdin)
        #[arg(long, default_value = "-")]
        input: PathBuf,

        /// Write records as JSON lines instead of printing a table
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print at most this many rows
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Run the quickstart query against a feature export
    Quickstart {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Features the store returns for the quickstart query, as JSON lines
        #[arg(long)]
        input: PathBuf,

        /// Also write records as JSON lines
        #[arg(long)]
        out: Option<PathBuf>,

        /// Skip printing the result table
        #[arg(long)]
        no_print: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Parse `x0,y0,x1,y1`
pub fn parse_bbox(s: &str) -> Result<[f64; 4], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(format!("expected x0,y0,x1,y1 but got '{}'", s));
    }

    let mut coords = [0.0; 4];
    for (slot, part) in coords.iter_mut().zip(&parts) {
        *slot = part
            .parse::<f64>()
            .map_err(|e| format!("bad coordinate '{}': {}", part, e))?;
    }
    Ok(coords)
}

/// Parse `t0/t1`
pub fn parse_during(s: &str) -> Result<(String, String), String> {
    match s.split_once('/') {
        Some((t0, t1)) if !t0.trim().is_empty() && !t1.trim().is_empty() => {
            Ok((t0.trim().to_string(), t1.trim().to_string()))
        }
        _ => Err(format!("expected t0/t1 but got '{}'", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_bbox() {
        assert_eq!(
            parse_bbox("-77.5,-37.5,-76.5,-36.5").unwrap(),
            [-77.5, -37.5, -76.5, -36.5]
        );
        assert!(parse_bbox("1,2,3").is_err());
        assert!(parse_bbox("1,2,3,x").is_err());
    }

    #[test]
    fn test_parse_during() {
        let (t0, t1) = parse_during("2014-07-01T00:00:00.000Z/2014-09-30T23:59:59.999Z").unwrap();
        assert_eq!(t0, "2014-07-01T00:00:00.000Z");
        assert_eq!(t1, "2014-09-30T23:59:59.999Z");
        assert!(parse_during("2014-07-01T00:00:00Z").is_err());
        assert!(parse_during("/2014-07-01T00:00:00Z").is_err());
    }

    #[test]
    fn test_filter_args() {
        let cli = Cli::try_parse_from([
            "geoquick",
            "filter",
            "--bbox",
            "-77.5,-37.5,-76.5,-36.5",
            "--attr",
            "(Who = 'Bierce')",
        ])
        .unwrap();
        match cli.command {
            Command::Filter { bbox, attr, geom_field, .. } => {
                assert_eq!(bbox, Some([-77.5, -37.5, -76.5, -36.5]));
                assert_eq!(attr.as_deref(), Some("(Who = 'Bierce')"));
                assert_eq!(geom_field, "Where");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}

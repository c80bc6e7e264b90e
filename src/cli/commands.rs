//! CLI command implementations
//!
//! Commands are thin: they parse inputs, call the library, and write
//! results to stdout. Logs go to stderr.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use crate::feature::{FeatureCursor, FeatureStore, FixtureStore, JsonLinesCursor, MemoryFeature};
use crate::filter::{
    attribute_filter, bbox_filter, combine, combine_grouped, during_filter, within_filter,
    FilterExpr, FilterResult,
};
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::output::{write_json_lines, write_quickstart, write_table};
use crate::projector::ResultProjector;
use crate::schema::{load_field_types, parse_type_spec, FieldTypes};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{open_input, write_json, write_line};

/// Attribute layout of the quickstart feature type
pub const QUICKSTART_SPEC: &str =
    "Who:String,What:java.lang.Long,When:Date,*Where:Point:srid=4326,Why:String";

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Filter {
            geom_field,
            bbox,
            within,
            date_field,
            during,
            attr,
            grouped,
        } => {
            let request = FilterRequest {
                geom_field,
                bbox,
                within,
                date_field,
                during,
                attr,
                grouped,
            };
            let filter = request.build()?;
            write_line(filter.as_str())
        }
        Command::Schema { spec, file } => {
            let types = match (spec, file) {
                (_, Some(path)) => load_field_types(&path)?,
                (Some(spec), None) => parse_type_spec(&spec)?,
                (None, None) => parse_type_spec("")?,
            };
            write_json(&types)
        }
        Command::Project {
            schema,
            input,
            out,
            limit,
        } => project(&schema, &input, out.as_deref(), limit),
        Command::Quickstart {
            config,
            input,
            out,
            no_print,
        } => quickstart(config.as_deref(), &input, out.as_deref(), no_print),
    }
}

/// The pieces of a filter given on the command line
#[derive(Debug, Clone, Default)]
pub struct FilterRequest {
    pub geom_field: String,
    pub bbox: Option<[f64; 4]>,
    pub within: Option<String>,
    pub date_field: String,
    pub during: Option<(String, String)>,
    pub attr: Option<String>,
    pub grouped: bool,
}

impl FilterRequest {
    /// Build fragments in bbox, within, during, attribute order and join them
    pub fn build(&self) -> FilterResult<FilterExpr> {
        let mut fragments = Vec::new();

        if let Some([x0, y0, x1, y1]) = self.bbox {
            fragments.push(bbox_filter(&self.geom_field, x0, y0, x1, y1)?);
        }
        if let Some(wkt) = &self.within {
            fragments.push(within_filter(&self.geom_field, wkt));
        }
        if let Some((t0, t1)) = &self.during {
            fragments.push(during_filter(&self.date_field, t0, t1)?);
        }
        if self.attr.is_some() || fragments.is_empty() {
            fragments.push(attribute_filter(self.attr.as_deref()));
        }

        let filter = if self.grouped {
            combine_grouped(&fragments)
        } else {
            combine(&fragments)
        };

        log_event_with_fields(Event::FilterBuilt, &[("filter", filter.as_str())]);
        Ok(filter)
    }
}

/// The canned quickstart query: Bierce's observations in one box over one summer
pub fn quickstart_filter() -> FilterResult<FilterExpr> {
    Ok(combine([
        bbox_filter("Where", -77.5, -37.5, -76.5, -36.5)?,
        during_filter("When", "2014-07-01T00:00:00.000Z", "2014-09-30T23:59:59.999Z")?,
        attribute_filter(Some("(Who = 'Bierce')")),
    ]))
}

/// Resolve `--schema`: an existing path is a schema file, anything else a spec string
fn resolve_schema(schema: &str) -> CliResult<FieldTypes> {
    let path = Path::new(schema);
    let types = if path.is_file() {
        load_field_types(path)?
    } else {
        parse_type_spec(schema)?
    };

    let count = types.len().to_string();
    log_event_with_fields(Event::SchemaLoaded, &[("fields", count.as_str())]);
    Ok(types)
}

fn project(schema: &str, input: &Path, out: Option<&Path>, limit: Option<usize>) -> CliResult<()> {
    let fields = resolve_schema(schema)?;
    let mut cursor = JsonLinesCursor::new(open_input(input)?, &fields);

    match out {
        Some(path) => {
            let count = write_json_lines(path, &fields, &mut cursor)?;
            write_line(&format!("{} records written to {}", count, path.display()))
        }
        None => {
            let results = ResultProjector::project(&fields, &mut cursor)?;
            write_table(&results, &mut io::stdout().lock(), limit)?;
            Ok(())
        }
    }
}

fn quickstart(
    config_path: Option<&Path>,
    input: &Path,
    out: Option<&Path>,
    no_print: bool,
) -> CliResult<()> {
    let config = match config_path {
        Some(path) => Config::load(path)?,
        None => {
            log_event(Event::ConfigDefaulted);
            Config::default()
        }
    };
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("instance_id", config.instance_id.as_str()),
            ("table_name", config.table_name.as_str()),
            ("zookeepers", config.zookeepers.as_str()),
        ],
    );

    let filter = quickstart_filter()?;
    let fixture = fixture_from_export(&config, &filter, input)?;
    let home = env::var_os("HOME").map(PathBuf::from);
    let store = config.connect(fixture, home.as_deref())?;

    let fields = store.field_types(&config.type_name)?;
    log_event_with_fields(
        Event::QueryStart,
        &[("filter", filter.as_str()), ("type_name", config.type_name.as_str())],
    );

    if !no_print {
        let mut cursor = query(&store, &config.type_name, &filter)?;
        let results = ResultProjector::project(&fields, &mut cursor)?;
        write_quickstart(&results, &mut io::stdout().lock(), config.print_limit)?;
    }

    if let Some(path) = out {
        let mut cursor = query(&store, &config.type_name, &filter)?;
        let count = write_json_lines(path, &fields, &mut cursor)?;
        write_line(&format!("{} records written to {}", count, path.display()))?;
    }

    Ok(())
}

fn query<S: FeatureStore>(store: &S, type_name: &str, filter: &FilterExpr) -> CliResult<S::Cursor> {
    store.get_features(type_name, filter).map_err(|e| {
        log_event_with_fields(Event::QueryFailed, &[("code", e.code())]);
        CliError::from(e)
    })
}

/// Load an export of the store's answer to `filter` into a fixture store
fn fixture_from_export(config: &Config, filter: &FilterExpr, input: &Path) -> CliResult<FixtureStore> {
    let fields = parse_type_spec(QUICKSTART_SPEC)?;
    let features = read_features(input, &fields)?;

    let mut store = FixtureStore::new();
    store.register_type(config.type_name.clone(), fields);
    store.respond(&config.type_name, filter, features)?;
    Ok(store)
}

fn read_features(input: &Path, fields: &FieldTypes) -> CliResult<Vec<MemoryFeature>> {
    let mut cursor = JsonLinesCursor::new(open_input(input)?, fields);
    let mut features = Vec::new();

    let result: CliResult<()> = (|| {
        while cursor.has_next()? {
            features.push(cursor.next()?);
        }
        Ok(())
    })();
    cursor.close();

    result.map(|()| features)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quickstart_filter() {
        assert_eq!(
            quickstart_filter().unwrap(),
            "BBOX(Where, -77.5, -37.5, -76.5, -36.5) AND (When DURING 2014-07-01T00:00:00.000Z/2014-09-30T23:59:59.999Z) AND (Who = 'Bierce')"
        );
    }

    #[test]
    fn test_empty_request_is_include() {
        let request = FilterRequest::default();
        assert_eq!(request.build().unwrap(), "INCLUDE");
    }

    #[test]
    fn test_request_fragment_order() {
        let request = FilterRequest {
            geom_field: "Where".into(),
            bbox: Some([-78.0, -39.0, -76.0, -37.0]),
            date_field: "When".into(),
            during: Some(("2014-01-01T00:00:00Z".into(), "2014-12-31T23:59:59Z".into())),
            ..FilterRequest::default()
        };
        assert_eq!(
            request.build().unwrap(),
            "BBOX(Where, -78, -39, -76, -37) AND (When DURING 2014-01-01T00:00:00Z/2014-12-31T23:59:59Z)"
        );
    }

    #[test]
    fn test_grouped_request() {
        let request = FilterRequest {
            attr: Some("Who = 'Addams' OR Who = 'Bierce'".into()),
            within: Some("POLYGON((0 0, 1 0, 1 1, 0 0))".into()),
            geom_field: "Where".into(),
            grouped: true,
            ..FilterRequest::default()
        };
        assert_eq!(
            request.build().unwrap(),
            "(WITHIN(Where, POLYGON((0 0, 1 0, 1 1, 0 0)))) AND (Who = 'Addams' OR Who = 'Bierce')"
        );
    }

    #[test]
    fn test_inverted_bbox_rejected() {
        let request = FilterRequest {
            geom_field: "Where".into(),
            bbox: Some([1.0, 0.0, 0.0, 1.0]),
            ..FilterRequest::default()
        };
        assert!(request.build().is_err());
    }
}

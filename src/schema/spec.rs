//! Parsers for the textual schema forms a GeoMesa store exposes
//!
//! - SimpleFeatureType spec strings: `Who:String,*Where:Point:srid=4326`
//! - GeoTools attribute descriptors: `AttributeDescriptorImpl Who<Who:String> nillable 0:1`

use regex::Regex;

use super::errors::{SchemaError, SchemaResult};
use super::types::{FieldDescriptor, FieldTypes};

/// Parse a SimpleFeatureType spec string into an ordered field map.
///
/// A leading `*` marks the default geometry and is dropped. Trailing
/// `:key=value` attribute options and `;`-separated user data are ignored.
/// Types are kept as written; they are resolved at projection time.
pub fn parse_type_spec(spec: &str) -> SchemaResult<FieldTypes> {
    let attributes = spec.split(';').next().unwrap_or("");
    let mut types = FieldTypes::new();

    for entry in attributes.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        let mut parts = entry.trim_start_matches('*').split(':');
        let name = parts.next().unwrap_or("").trim();
        let type_name = parts.next().unwrap_or("").trim();

        if name.is_empty() {
            return Err(SchemaError::malformed(entry, "missing attribute name"));
        }
        if type_name.is_empty() || type_name.contains('=') {
            return Err(SchemaError::malformed(entry, "missing attribute type"));
        }
        if types.contains(name) {
            return Err(SchemaError::malformed(entry, "duplicate attribute name"));
        }

        types.insert(name, FieldDescriptor::new(type_name));
    }

    if types.is_empty() {
        return Err(SchemaError::malformed(spec, "no attributes declared"));
    }

    Ok(types)
}

/// Extract the binding type from a GeoTools attribute descriptor string.
///
/// The type is the text between `<name:` and the next `>`.
pub fn parse_attribute_descriptor(name: &str, descriptor: &str) -> SchemaResult<String> {
    let pattern = format!("<{}:([^>]+)>", regex::escape(name));
    let re = Regex::new(&pattern)
        .map_err(|e| SchemaError::malformed(descriptor, format!("bad attribute name: {}", e)))?;

    re.captures(descriptor)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .ok_or_else(|| {
            SchemaError::malformed(descriptor, format!("no type binding for '{}'", name))
        })
}

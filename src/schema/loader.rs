//! Loading field maps from disk
//!
//! Two file forms are accepted:
//! - `*.json`: an object of field name to `{type, nillable, default}`
//! - anything else: a SimpleFeatureType spec string

use std::fs;
use std::path::Path;

use super::errors::{SchemaError, SchemaResult};
use super::spec::parse_type_spec;
use super::types::FieldTypes;

/// Read a field map from a schema file.
pub fn load_field_types(path: &Path) -> SchemaResult<FieldTypes> {
    let content = fs::read_to_string(path).map_err(|e| {
        SchemaError::io(path.display().to_string(), format!("Failed to read file: {}", e))
    })?;

    let is_json = path.extension().map_or(false, |ext| ext == "json");
    let types = if is_json {
        serde_json::from_str::<FieldTypes>(&content).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?
    } else {
        parse_type_spec(content.trim())?
    };

    if types.is_empty() {
        return Err(SchemaError::malformed(
            path.display().to_string(),
            "no attributes declared",
        ));
    }

    Ok(types)
}

/// Write a field map as pretty JSON.
pub fn save_field_types(path: &Path, types: &FieldTypes) -> SchemaResult<()> {
    let content = serde_json::to_string_pretty(types).map_err(|e| {
        SchemaError::malformed(
            path.display().to_string(),
            format!("Failed to serialize schema: {}", e),
        )
    })?;

    fs::write(path, content).map_err(|e| {
        SchemaError::io(path.display().to_string(), format!("Failed to write file: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDescriptor, FieldType};
    use tempfile::TempDir;

    #[test]
    fn test_json_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("quickstart.json");

        let types = FieldTypes::new()
            .with("Who", FieldDescriptor::of(FieldType::String))
            .with("Where", FieldDescriptor::of(FieldType::Point).with_nillable(false));
        save_field_types(&path, &types).unwrap();

        let loaded = load_field_types(&path).unwrap();
        assert_eq!(loaded, types);
    }

    #[test]
    fn test_spec_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("quickstart.sft");
        fs::write(&path, "Who:String,*Where:Point:srid=4326\n").unwrap();

        let loaded = load_field_types(&path).unwrap();
        assert_eq!(loaded.names().collect::<Vec<_>>(), vec!["Who", "Where"]);
    }

    #[test]
    fn test_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = load_field_types(&tmp.path().join("nope.json")).unwrap_err();
        assert_eq!(err.code(), "GEO_SCHEMA_IO");
    }

    #[test]
    fn test_empty_json_object_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.json");
        fs::write(&path, "{}").unwrap();

        let err = load_field_types(&path).unwrap_err();
        assert_eq!(err.code(), "GEO_MALFORMED_SCHEMA");
    }
}

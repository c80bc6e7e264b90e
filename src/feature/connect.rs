//! Opening a feature store from connection settings
//!
//! Settings are checked before the store is handed out:
//! - every required parameter is present, and all but the password are non-empty
//! - every classpath entry exists; a `dir/*` entry only needs `dir`
//!
//! The settings travel with the returned handle. Nothing is kept in
//! process-wide state.

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::filter::FilterExpr;
use crate::observability::{log_event_with_fields, Event};
use crate::schema::FieldTypes;

use super::errors::{StoreError, StoreResult};
use super::traits::FeatureStore;

/// Data store parameters a connection needs
pub const REQUIRED_PARAMS: [&str; 5] = ["instanceId", "zookeepers", "user", "password", "tableName"];

const SECRET_PARAMS: [&str; 1] = ["password"];

/// An opened store together with the settings it was opened with
pub struct StoreHandle<S> {
    params: BTreeMap<String, String>,
    classpath: Vec<PathBuf>,
    store: S,
}

/// Check connection settings and wrap `store` in a handle.
///
/// `classpath` is a platform path list (`:`-separated on Unix), already
/// expanded. Fails with `StoreError::Connect` naming the first bad setting.
pub fn connect<S, K>(
    params: impl IntoIterator<Item = (K, String)>,
    classpath: Option<&Path>,
    store: S,
) -> StoreResult<StoreHandle<S>>
where
    S: FeatureStore,
    K: Into<String>,
{
    let params: BTreeMap<String, String> = params.into_iter().map(|(k, v)| (k.into(), v)).collect();

    let result = check_params(&params).and_then(|()| check_classpath(classpath));
    let classpath = match result {
        Ok(entries) => entries,
        Err(e) => {
            let message = e.to_string();
            log_event_with_fields(
                Event::StoreConnectFailed,
                &[("code", e.code()), ("message", message.as_str())],
            );
            return Err(e);
        }
    };

    let entries = classpath.len().to_string();
    let param = |key: &str| params.get(key).map(String::as_str).unwrap_or_default();
    log_event_with_fields(
        Event::StoreConnected,
        &[
            ("classpath_entries", entries.as_str()),
            ("instance_id", param("instanceId")),
            ("table_name", param("tableName")),
            ("user", param("user")),
            ("zookeepers", param("zookeepers")),
        ],
    );

    Ok(StoreHandle {
        params,
        classpath,
        store,
    })
}

fn check_params(params: &BTreeMap<String, String>) -> StoreResult<()> {
    for key in REQUIRED_PARAMS {
        match params.get(key) {
            None => {
                return Err(StoreError::Connect(format!("missing parameter '{}'", key)));
            }
            Some(value) if value.trim().is_empty() && !SECRET_PARAMS.contains(&key) => {
                return Err(StoreError::Connect(format!("parameter '{}' is empty", key)));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn check_classpath(classpath: Option<&Path>) -> StoreResult<Vec<PathBuf>> {
    let classpath = match classpath {
        Some(cp) => cp,
        None => return Ok(Vec::new()),
    };

    let entries: Vec<PathBuf> = env::split_paths(classpath.as_os_str())
        .filter(|p| !p.as_os_str().is_empty())
        .collect();
    if entries.is_empty() {
        return Err(StoreError::Connect("classpath is empty".to_string()));
    }

    for entry in &entries {
        let target = match entry.file_name() {
            Some(name) if name == "*" => entry.parent().unwrap_or_else(|| Path::new(".")),
            _ => entry.as_path(),
        };
        if !target.exists() {
            return Err(StoreError::Connect(format!(
                "classpath entry '{}' does not exist",
                entry.display()
            )));
        }
    }

    Ok(entries)
}

impl<S> StoreHandle<S> {
    /// Value of a connection parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Checked classpath entries, in order
    pub fn classpath(&self) -> &[PathBuf] {
        &self.classpath
    }
}

impl<S> fmt::Debug for StoreHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: BTreeMap<&str, &str> = self
            .params
            .iter()
            .map(|(k, v)| {
                let secret = SECRET_PARAMS.iter().any(|s| *s == k.as_str());
                let shown = if secret { "***" } else { v.as_str() };
                (k.as_str(), shown)
            })
            .collect();
        f.debug_struct("StoreHandle")
            .field("params", &params)
            .field("classpath", &self.classpath)
            .finish_non_exhaustive()
    }
}

impl<S: FeatureStore> FeatureStore for StoreHandle<S> {
    type Cursor = S::Cursor;

    fn type_names(&self) -> Vec<String> {
        self.store.type_names()
    }

    fn field_types(&self, type_name: &str) -> StoreResult<FieldTypes> {
        self.store.field_types(type_name)
    }

    fn get_features(&self, type_name: &str, filter: &FilterExpr) -> StoreResult<S::Cursor> {
        self.store.get_features(type_name, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{FixtureStore, MemoryFeature, RawValue};
    use crate::schema::{FieldDescriptor, FieldType};
    use std::fs;
    use tempfile::TempDir;

    fn params() -> Vec<(&'static str, String)> {
        vec![
            ("instanceId", "local".to_string()),
            ("zookeepers", "localhost".to_string()),
            ("user", "root".to_string()),
            ("password", "secret".to_string()),
            ("tableName", "quickstart".to_string()),
        ]
    }

    fn without(key: &str) -> Vec<(&'static str, String)> {
        params().into_iter().filter(|(k, _)| *k != key).collect()
    }

    fn with(key: &'static str, value: &str) -> Vec<(&'static str, String)> {
        let mut p = without(key);
        p.push((key, value.to_string()));
        p
    }

    #[test]
    fn test_connect_without_classpath() {
        let handle = connect(params(), None, FixtureStore::new()).unwrap();
        assert_eq!(handle.param("instanceId"), Some("local"));
        assert_eq!(handle.param("tableName"), Some("quickstart"));
        assert!(handle.classpath().is_empty());
    }

    #[test]
    fn test_missing_or_empty_params_rejected() {
        let err = connect(without("user"), None, FixtureStore::new()).unwrap_err();
        assert_eq!(err.code(), "GEO_STORE_CONNECT");
        assert!(err.to_string().contains("'user'"));

        let err = connect(with("zookeepers", " "), None, FixtureStore::new()).unwrap_err();
        assert!(err.to_string().contains("'zookeepers'"));

        assert!(connect(without("password"), None, FixtureStore::new()).is_err());
    }

    #[test]
    fn test_empty_password_allowed() {
        let handle = connect(with("password", ""), None, FixtureStore::new()).unwrap();
        assert_eq!(handle.param("password"), Some(""));
    }

    #[test]
    fn test_classpath_entries_checked() {
        let tmp = TempDir::new().unwrap();
        let lib = tmp.path().join("lib");
        fs::create_dir(&lib).unwrap();
        let jar = tmp.path().join("geomesa-accumulo.jar");
        fs::write(&jar, b"").unwrap();

        let classpath = env::join_paths([lib.join("*"), jar.clone()]).unwrap();
        let handle = connect(params(), Some(Path::new(&classpath)), FixtureStore::new()).unwrap();
        assert_eq!(handle.classpath(), &[lib.join("*"), jar][..]);

        let missing = tmp.path().join("hadoop").join("*");
        let err = connect(params(), Some(missing.as_path()), FixtureStore::new()).unwrap_err();
        assert_eq!(err.code(), "GEO_STORE_CONNECT");
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_debug_hides_password() {
        let handle = connect(params(), None, FixtureStore::new()).unwrap();
        let shown = format!("{:?}", handle);
        assert!(shown.contains("quickstart"));
        assert!(!shown.contains("secret"));
    }

    #[test]
    fn test_handle_delegates_queries() {
        let fields = FieldTypes::new().with("Who", FieldDescriptor::of(FieldType::String));
        let mut store = FixtureStore::new();
        store.register_type("AccumuloQuickStart", fields.clone());
        store
            .respond(
                "AccumuloQuickStart",
                &FilterExpr::include(),
                vec![MemoryFeature::new().set("Who", RawValue::text("Bierce"))],
            )
            .unwrap();

        let handle = connect(params(), None, store).unwrap();
        assert_eq!(handle.type_names(), vec!["AccumuloQuickStart".to_string()]);
        assert_eq!(handle.field_types("AccumuloQuickStart").unwrap(), fields);

        let cursor = handle
            .get_features("AccumuloQuickStart", &FilterExpr::include())
            .unwrap();
        assert_eq!(cursor.remaining(), 1);
    }
}

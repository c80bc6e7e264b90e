//! Connection configuration for the feature store
//!
//! Loaded from a JSON file. Every field has a default matching a local
//! single-node Accumulo install, so an empty object is a valid config.
//! The config is passed explicitly to the code that needs it; nothing is
//! stored in process-wide state.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::feature::{connect, FeatureStore, StoreHandle, StoreResult};

use super::errors::{CliError, CliResult};

/// Store connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Accumulo instance name
    #[serde(default = "default_instance_id")]
    pub instance_id: String,

    /// Zookeeper nodes, comma separated
    #[serde(default = "default_zookeepers")]
    pub zookeepers: String,

    /// Accumulo user with read permission on the catalog table
    #[serde(default = "default_user")]
    pub user: String,

    /// Password for `user`
    #[serde(default = "default_password")]
    pub password: String,

    /// GeoMesa catalog table
    #[serde(default = "default_table_name")]
    pub table_name: String,

    /// Feature type to query
    #[serde(default = "default_type_name")]
    pub type_name: String,

    /// Client library classpath; `~` expands to the home directory
    #[serde(default)]
    pub classpath: Option<String>,

    /// Cap on rows printed by the quickstart table; unset prints every result
    #[serde(default)]
    pub print_limit: Option<usize>,
}

fn default_instance_id() -> String {
    "local".to_string()
}
fn default_zookeepers() -> String {
    "localhost".to_string()
}
fn default_user() -> String {
    "root".to_string()
}
fn default_password() -> String {
    "secret".to_string()
}
fn default_table_name() -> String {
    "quickstart".to_string()
}
fn default_type_name() -> String {
    "AccumuloQuickStart".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instance_id: default_instance_id(),
            zookeepers: default_zookeepers(),
            user: default_user(),
            password: default_password(),
            table_name: default_table_name(),
            type_name: default_type_name(),
            classpath: None,
            print_limit: None,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Reject empty required settings
    pub fn validate(&self) -> CliResult<()> {
        let required = [
            ("instance_id", &self.instance_id),
            ("zookeepers", &self.zookeepers),
            ("user", &self.user),
            ("table_name", &self.table_name),
            ("type_name", &self.type_name),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(CliError::config_error(format!("{} must not be empty", name)));
            }
        }

        if self.zookeepers.split(',').any(|z| z.trim().is_empty()) {
            return Err(CliError::config_error(format!(
                "Invalid zookeepers: '{}'",
                self.zookeepers
            )));
        }

        Ok(())
    }

    /// Data store parameters in the form the GeoMesa Accumulo store expects
    pub fn connection_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("instanceId", self.instance_id.clone()),
            ("zookeepers", self.zookeepers.clone()),
            ("user", self.user.clone()),
            ("password", self.password.clone()),
            ("tableName", self.table_name.clone()),
        ]
    }

    /// Open `store` with these settings.
    ///
    /// The classpath is expanded against `home` and every entry must exist.
    pub fn connect<S: FeatureStore>(
        &self,
        store: S,
        home: Option<&Path>,
    ) -> StoreResult<StoreHandle<S>> {
        let classpath = self.expanded_classpath(home);
        connect(self.connection_params(), classpath.as_deref(), store)
    }

    /// Classpath with a leading `~` expanded against `home`
    pub fn expanded_classpath(&self, home: Option<&Path>) -> Option<PathBuf> {
        let classpath = self.classpath.as_deref()?;
        match (classpath.strip_prefix('~'), home) {
            (Some(rest), Some(home)) => Some(home.join(rest.trim_start_matches('/'))),
            _ => Some(PathBuf::from(classpath)),
        }
    }
}

//! Configuration for the dashboard
//!
//! Loaded from TOML (or JSON) with every field defaulted:
//!
//! ```toml
//! [database]
//! path = "lastmile.db"
//! items_table = "def"
//! create_if_missing = true
//!
//! [server]
//! addr = "127.0.0.1:8080"
//! form_action = "?p=cfg"
//!
//! [[reports]]
//! title = "All items"
//! sql = "SELECT itemid, host, role FROM def"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::schema::ItemsTable;
use crate::workflow::DEFAULT_FORM_ACTION;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "LASTMILE_CONFIG";

/// Dashboard configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Database location and items table
    pub database: DatabaseConfig,
    /// HTTP server settings
    pub server: ServerConfig,
    /// Queries shown on the reports page
    pub reports: Vec<ReportConfig>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file
    pub path: PathBuf,
    /// Table holding the items
    pub items_table: ItemsTable,
    /// Create the items table on startup when it is missing
    pub create_if_missing: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("lastmile.db"),
            items_table: ItemsTable::default(),
            create_if_missing: true,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub addr: String,
    /// Target of the per-row edit form
    pub form_action: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8080".to_string(),
            form_action: DEFAULT_FORM_ACTION.to_string(),
        }
    }
}

/// A named report query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub title: String,
    pub sql: String,
}

impl DashboardConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from standard locations, falling back to defaults
    ///
    /// Order: `$LASTMILE_CONFIG`, `{project_root}/.lastmile/config.toml`,
    /// `~/.lastmile/config.toml`.
    pub fn load_standard(project_root: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        match Self::find_config_file(explicit, project_root, dirs::home_dir()) {
            Some(path) => {
                tracing::info!("Loading config from {:?}", path);
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Pick the config file to load, first match wins
    ///
    /// An explicit path is returned even when it does not exist.
    fn find_config_file(
        explicit: Option<PathBuf>,
        project_root: Option<&Path>,
        home: Option<PathBuf>,
    ) -> Option<PathBuf> {
        if explicit.is_some() {
            return explicit;
        }
        let project = project_root.map(|root| root.join(".lastmile").join("config.toml"));
        let user = home.map(|home| home.join(".lastmile").join("config.toml"));
        project.into_iter().chain(user).find(|p| p.is_file())
    }

    /// Reports to show, with a listing of the items table when none are configured
    pub fn effective_reports(&self) -> Vec<ReportConfig> {
        if !self.reports.is_empty() {
            return self.reports.clone();
        }
        vec![ReportConfig {
            title: "All items".to_string(),
            sql: format!(
                "SELECT itemid, host, role FROM {}",
                self.database.items_table.quoted()
            ),
        }]
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.addr.trim().is_empty() {
            return Err(ConfigError::MissingField("server.addr".to_string()));
        }

        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("database.path".to_string()));
        }

        if let Some(report) = self.reports.iter().find(|r| r.sql.trim().is_empty()) {
            return Err(ConfigError::MissingField(format!(
                "reports[{:?}].sql",
                report.title
            )));
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid table name: {0:?} (expected a plain identifier)")]
    InvalidTableName(String),
}

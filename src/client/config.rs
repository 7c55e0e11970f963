//! Client configuration
//!
//! Resolved in order: environment variables (`LIFTLOG_API_URL`,
//! `LIFTLOG_DB_PATH`), the TOML file named by `LIFTLOG_CONFIG`, then defaults.

use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the API server
pub const ENV_API_URL: &str = "LIFTLOG_API_URL";
/// Environment variable overriding the local database file
pub const ENV_DB_PATH: &str = "LIFTLOG_DB_PATH";
/// Environment variable pointing at a TOML configuration file
pub const ENV_CONFIG_FILE: &str = "LIFTLOG_CONFIG";

/// Client configuration wrapper.
#[derive(Debug, Clone)]
pub struct Config {
    app: AppConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self {
            app: builder.build()?,
        })
    }

    /// Resolve the configuration from the environment
    ///
    /// `LIFTLOG_CONFIG` names a TOML file used as the base; `LIFTLOG_API_URL` and
    /// `LIFTLOG_DB_PATH` override individual values.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = match std::env::var(ENV_CONFIG_FILE) {
            Ok(path) => AppConfig::from_file(path)?,
            Err(_) => AppConfig::default(),
        };

        let mut builder = AppConfig::builder()
            .server_url(std::env::var(ENV_API_URL).unwrap_or(base.server_url))
            .api_prefix(base.api_prefix)
            .probe_interval_secs(base.probe_interval_secs);

        if let Some(path) = std::env::var_os(ENV_DB_PATH)
            .map(PathBuf::from)
            .or(base.database_path)
        {
            builder = builder.database_path(path);
        }

        Self::with_builder(builder)
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.server_url(), self.app.api_prefix, path)
    }

    /// URL of the unauthenticated health endpoint used for reachability
    pub fn health_url(&self) -> String {
        format!("{}/health", self.server_url())
    }

    pub fn server_url(&self) -> &str {
        &self.app.server_url
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.app.probe_interval_secs)
    }

    /// Local database file, defaulting to the platform data directory
    pub fn database_path(&self) -> PathBuf {
        match &self.app.database_path {
            Some(path) => path.clone(),
            None => {
                let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
                path.push("liftlog");
                path.push("local.db");
                path
            }
        }
    }
}

//! Application configuration module
//!
//! Provides the validated configuration of the client: where the API lives,
//! where the local database is stored and how often reachability is probed.
//! A configuration can be assembled with [`AppConfigBuilder`] or loaded from a
//! TOML file:
//!
//! ```toml
//! server_url = "https://gym.example.com"
//! api_prefix = "/api"
//! database_path = "/var/lib/liftlog/local.db"
//! probe_interval_secs = 15
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default API server
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Default prefix of every API route
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Default reachability probe cadence
pub const DEFAULT_PROBE_INTERVAL_SECS: u64 = 10;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server URL (scheme, host and port, no trailing slash)
    pub server_url: String,
    /// Prefix prepended to API paths such as `/templates`
    pub api_prefix: String,
    /// Local SQLite database file; `None` uses the platform data directory
    pub database_path: Option<PathBuf>,
    /// Seconds between reachability probes
    pub probe_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            database_path: None,
            probe_interval_secs: DEFAULT_PROBE_INTERVAL_SECS,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: AppConfig =
            toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.normalized().validate()
    }

    /// Load and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&source)
    }

    /// Validate the configuration
    pub fn validate(self) -> Result<Self, ConfigError> {
        let url = reqwest::Url::parse(&self.server_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.server_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "{}: unsupported scheme '{}'",
                self.server_url,
                url.scheme()
            )));
        }
        if !self.api_prefix.is_empty() && !self.api_prefix.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "api_prefix",
                message: "must start with '/'".to_string(),
            });
        }
        if self.probe_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "probe_interval_secs",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(self)
    }

    fn normalized(mut self) -> Self {
        while self.server_url.ends_with('/') {
            self.server_url.pop();
        }
        while self.api_prefix.ends_with('/') {
            self.api_prefix.pop();
        }
        self
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    api_prefix: Option<String>,
    database_path: Option<PathBuf>,
    probe_interval_secs: Option<u64>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the API prefix
    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = Some(prefix.into());
        self
    }

    /// Set the local database file
    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = Some(path.into());
        self
    }

    /// Set the probe interval
    pub fn probe_interval_secs(mut self, secs: u64) -> Self {
        self.probe_interval_secs = Some(secs);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        AppConfig {
            server_url: self.server_url.unwrap_or(defaults.server_url),
            api_prefix: self.api_prefix.unwrap_or(defaults.api_prefix),
            database_path: self.database_path.or(defaults.database_path),
            probe_interval_secs: self
                .probe_interval_secs
                .unwrap_or(defaults.probe_interval_secs),
        }
        .normalized()
        .validate()
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("failed to read {path:?}: {message}")]
    Io { path: PathBuf, message: String },
}

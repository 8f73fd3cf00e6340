//! Process configuration
//!
//! Loaded from an optional JSON file, then overridden by environment
//! variables:
//!
//! | variable | field |
//! |---|---|
//! | `HOST` | `http.host` |
//! | `PORT` | `http.port` |
//! | `CORS_ORIGINS` | `http.cors_origins` (comma separated) |
//! | `DATABASE_URI` | `database_uri` |
//! | `LOG_LEVEL` | `log_level` |
//! | `LOG_FORMAT` | `log_format` (`text` or `json`) |
//!
//! `DATABASE_URI` is required; [`Config::validate`] fails without it.

mod errors;
mod http;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::observability::LogFormat;
use crate::storage::StoreLocation;

pub use errors::{ConfigError, ConfigResult};
pub use http::HttpConfig;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,

    /// Document store connection string
    #[serde(default)]
    pub database_uri: Option<String>,

    /// Log filter directive (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            database_uri: None,
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Loads the file (if any), applies the process environment and
    /// validates the result.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Overrides fields from environment variables read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<()> {
        if let Some(host) = lookup("HOST") {
            self.http.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.http.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("PORT", format!("'{}' is not a port", port)))?;
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.http.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(uri) = lookup("DATABASE_URI") {
            self.database_uri = Some(uri);
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.log_format = LogFormat::parse(&format).ok_or_else(|| {
                ConfigError::invalid("LOG_FORMAT", format!("'{}' is not text or json", format))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.store_location()?;
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::invalid("log_level", "must not be empty"));
        }
        Ok(())
    }

    /// Parsed `database_uri`
    pub fn store_location(&self) -> ConfigResult<StoreLocation> {
        let uri = self
            .database_uri
            .as_deref()
            .filter(|uri| !uri.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUri)?;
        StoreLocation::parse(uri)
            .ok_or_else(|| ConfigError::invalid("DATABASE_URI", format!("'{}' is not a store", uri)))
    }
}

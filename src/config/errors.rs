//! Configuration error types
//!
//! Error codes:
//! - RECORDHUB_CONFIG_READ
//! - RECORDHUB_CONFIG_PARSE
//! - RECORDHUB_CONFIG_INVALID
//! - RECORDHUB_CONFIG_MISSING_DATABASE_URI

use thiserror::Error;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("DATABASE_URI is not set")]
    MissingDatabaseUri,
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read(_) => "RECORDHUB_CONFIG_READ",
            ConfigError::Parse(_) => "RECORDHUB_CONFIG_PARSE",
            ConfigError::Invalid { .. } => "RECORDHUB_CONFIG_INVALID",
            ConfigError::MissingDatabaseUri => "RECORDHUB_CONFIG_MISSING_DATABASE_URI",
        }
    }

    pub(crate) fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

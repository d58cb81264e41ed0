use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::constants::{DEFAULT_API_URL, DEFAULT_DATABASE_SUBPATH};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing API token: pass --token or set {0}")]
    MissingToken(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("cannot determine home directory; set DATABASE_PATH")]
    NoHomeDir,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // EnsembleData API
    pub api_url: String,
    pub api_token: Option<String>,
    pub http_timeout: Duration,

    // Database
    pub database_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed, or if
    /// no database path is set and the home directory is unknown.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_path = match optional_env("DATABASE_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_database_path()?,
        };

        Ok(Self {
            api_url: env_or_default("ENSEMBLE_API_URL", DEFAULT_API_URL),
            api_token: optional_env("ENSEMBLE_TOKEN"),
            http_timeout: Duration::from_secs(parse_env_u64("HTTP_TIMEOUT_SECS", 60)?),
            database_path,
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "ENSEMBLE_API_URL".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                name: "ENSEMBLE_API_URL".to_string(),
                message: format!("must be an http(s) URL, got '{}'", self.api_url),
            });
        }
        if self.http_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "HTTP_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// The API token, or an error naming where it can be supplied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingToken`] if no token is configured.
    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.api_token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingToken("ENSEMBLE_TOKEN".to_string()))
    }

    /// Configuration pointing at a local API root and database, for tests.
    #[must_use]
    pub fn for_testing(api_url: &str, database_path: PathBuf) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_token: Some("test-token".to_string()),
            http_timeout: Duration::from_secs(5),
            database_path,
        }
    }
}

fn default_database_path() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_DATABASE_SUBPATH))
        .ok_or(ConfigError::NoHomeDir)
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

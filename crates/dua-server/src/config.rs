//! Server configuration.
//!
//! Values come from three layers, later ones winning:
//!
//! 1. built-in defaults
//! 2. an optional TOML file
//! 3. `DUA_BIND` / `DUA_DATABASE` environment variables
//!
//! Command-line flags are applied on top by the binary.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub const BIND_ENV: &str = "DUA_BIND";
pub const DATABASE_ENV: &str = "DUA_DATABASE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid {key} value: {value:?}")]
    InvalidEnv { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind: SocketAddr,
    /// Path of the SQLite database holding the corpus.
    pub database: PathBuf,
    /// `Access-Control-Max-Age` for CORS preflight responses, in seconds.
    pub cors_max_age_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3001)),
            database: PathBuf::from("dua_main.sqlite"),
            cors_max_age_secs: 60 * 60,
        }
    }
}

impl ServerConfig {
    /// Defaults, then the file (if any), then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Loaded server config");
        Ok(config)
    }

    /// Override fields from environment-style lookups.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(BIND_ENV) {
            self.bind = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                key: BIND_ENV,
                value: value.clone(),
            })?;
            debug!(bind = %self.bind, "{BIND_ENV} override");
        }
        if let Some(value) = lookup(DATABASE_ENV) {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::InvalidEnv {
                    key: DATABASE_ENV,
                    value,
                });
            }
            self.database = PathBuf::from(trimmed);
            debug!(database = %self.database.display(), "{DATABASE_ENV} override");
        }
        Ok(())
    }
}

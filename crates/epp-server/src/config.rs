//! Server configuration
//!
//! Read from the TOML file named by `EPP_CONFIG` when set, then
//! overridden by `EPP_ADDR` and `EPP_SQLITE_PATH`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use epp_core::{ConfigError, RepositoryConfig};

pub const CONFIG_ENV: &str = "EPP_CONFIG";
pub const ADDR_ENV: &str = "EPP_ADDR";
pub const SQLITE_PATH_ENV: &str = "EPP_SQLITE_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default)]
    pub repository: RepositoryConfig,
}

fn default_addr() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            repository: RepositoryConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ServerConfigError> {
        toml::from_str(toml_str).map_err(|e| ServerConfigError::Parse(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self, ServerConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ServerConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    /// Load from the process environment.
    pub fn load() -> Result<Self, ServerConfigError> {
        let config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        let config = config.with_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `EPP_ADDR` and `EPP_SQLITE_PATH` as resolved by `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(addr) = lookup(ADDR_ENV) {
            self.addr = addr;
        }
        if let Some(path) = lookup(SQLITE_PATH_ENV) {
            self.repository = RepositoryConfig::sqlite(path);
        }
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ServerConfigError> {
        if self.addr.trim().is_empty() {
            return Err(ServerConfigError::Invalid("addr must not be empty".to_string()));
        }
        self.repository.validate()?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Repository(#[from] ConfigError),
}

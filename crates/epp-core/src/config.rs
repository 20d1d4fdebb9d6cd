//! Repository configuration
//!
//! Selects the storage backend and opens it as a shared repository.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::memory_store::InMemoryArticleStore;
use crate::store::{ArticleRepository, StoreError};

/// Storage backend selection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Backend {
    /// Records live only as long as the process
    #[default]
    InMemory,
    /// SQLite database file
    Sqlite { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default)]
    pub backend: Backend,
}

impl RepositoryConfig {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::Sqlite { path: path.into() },
        }
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Backend::Sqlite { path } = &self.backend {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("sqlite path must not be empty".to_string()));
            }
        }
        Ok(())
    }

    /// Validate and open the configured backend.
    pub fn open(&self) -> Result<Arc<dyn ArticleRepository>, StoreError> {
        self.validate()?;
        match &self.backend {
            Backend::InMemory => {
                info!("using in-memory article store");
                Ok(Arc::new(InMemoryArticleStore::new()))
            }
            #[cfg(feature = "sqlite")]
            Backend::Sqlite { path } => {
                info!(path = %path.display(), "using sqlite article store");
                Ok(Arc::new(crate::sqlite_store::SqliteArticleStore::open(path)?))
            }
            #[cfg(not(feature = "sqlite"))]
            Backend::Sqlite { .. } => Err(ConfigError::Unsupported("sqlite").into()),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Backend not compiled in: {0}")]
    Unsupported(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_in_memory() {
        let config = RepositoryConfig::default();
        assert_eq!(config.backend, Backend::InMemory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_toml_and_json() {
        let config = RepositoryConfig::from_toml(
            r#"
            [backend]
            type = "sqlite"
            path = "/var/lib/epp/articles.db"
            "#,
        )
        .unwrap();
        assert_eq!(config, RepositoryConfig::sqlite("/var/lib/epp/articles.db"));

        let config = RepositoryConfig::from_json(r#"{ "backend": { "type": "in_memory" } }"#).unwrap();
        assert_eq!(config.backend, Backend::InMemory);

        assert!(RepositoryConfig::from_toml("").unwrap().backend == Backend::InMemory);
    }

    #[test]
    fn rejects_empty_sqlite_path() {
        let config = RepositoryConfig::sqlite("");
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        assert!(matches!(config.open(), Err(StoreError::Config(_))));
    }

    #[test]
    fn unknown_backend_is_parse_error() {
        let err = RepositoryConfig::from_json(r#"{ "backend": { "type": "mongodb" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn opens_sqlite_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = RepositoryConfig::sqlite(dir.path().join("epp.db"));
        assert!(config.open().is_ok());
    }
}

//! Application configuration.

use std::path::Path;
use std::sync::Arc;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::db::SqliteStore;
use crate::history::{HistoryStore, MemoryStore, NullStore};

/// Where the result history is kept.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StorageBackend {
    /// Nothing is persisted.
    None,
    /// Kept for the lifetime of the process only.
    Memory,
    /// SQLite database file.
    #[default]
    Sqlite,
}

/// Application configuration, usually read from a TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// History storage backend.
    #[serde(default)]
    storage: StorageBackend,

    /// Database file used by the SQLite backend.
    #[serde(default = "default_db_path")]
    db_path: String,
}

fn default_db_path() -> String {
    "strictly_noughts.db".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::default(),
            db_path: default_db_path(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(storage = %config.storage, "Config loaded successfully");
        Ok(config)
    }

    /// Overrides the storage backend.
    pub fn with_storage(mut self, storage: StorageBackend) -> Self {
        self.storage = storage;
        self
    }

    /// Overrides the database path.
    pub fn with_db_path(mut self, db_path: impl Into<String>) -> Self {
        self.db_path = db_path.into();
        self
    }

    /// Builds the configured history store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the SQLite database cannot be opened.
    #[instrument(skip(self), fields(storage = %self.storage))]
    pub fn open_store(&self) -> Result<Arc<dyn HistoryStore>, ConfigError> {
        let store: Arc<dyn HistoryStore> = match self.storage {
            StorageBackend::None => Arc::new(NullStore),
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
            StorageBackend::Sqlite => Arc::new(
                SqliteStore::open(self.db_path.clone())
                    .map_err(|e| ConfigError::new(format!("Failed to open store: {}", e)))?,
            ),
        };
        Ok(store)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

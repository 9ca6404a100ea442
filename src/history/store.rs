//! Key-value persistence for the result history.

use async_trait::async_trait;
use derive_more::{Display, Error};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

/// Key under which the serialized history is stored.
pub const HISTORY_KEY: &str = "@tic-tac-toe";

/// Persistence error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Asynchronous key-value store holding opaque blobs.
#[async_trait]
pub trait HistoryStore: Send + Sync + std::fmt::Debug {
    /// Reads the blob stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes `blob` under `key`, replacing any previous value.
    async fn set(&self, key: &str, blob: String) -> Result<(), StoreError>;
}

/// Store used when nothing should persist: reads are always absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

#[async_trait]
impl HistoryStore for NullStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _blob: String) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Process-local store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `blob` under `key`.
    pub fn with_entry(key: impl Into<String>, blob: impl Into<String>) -> Self {
        let entries: HashMap<String, String> = HashMap::from([(key.into(), blob.into())]);
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|e| StoreError::new(format!("Memory store poisoned: {}", e)))
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self.lock()?.get(key).cloned();
        debug!(found = value.is_some(), "Memory store read");
        Ok(value)
    }

    #[instrument(skip(self, blob))]
    async fn set(&self, key: &str, blob: String) -> Result<(), StoreError> {
        self.lock()?.insert(key.to_string(), blob);
        debug!("Memory store write");
        Ok(())
    }
}

//! SQLite-backed key-value store.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::models::KvEntry;
use crate::db::{DbError, schema};
use crate::history::{HistoryStore, StoreError};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Key-value store in a single SQLite table.
///
/// Connections are opened per operation; async calls run on the blocking
/// thread pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: String,
}

impl SqliteStore {
    /// Opens the database at `db_path`, creating the schema if needed.
    ///
    /// Use `":memory:"` only for throwaway stores: every operation opens a
    /// fresh connection, so an in-memory database does not survive between
    /// calls.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path))]
    pub fn open(db_path: impl Into<String>) -> Result<Self, DbError> {
        let store = Self {
            db_path: db_path.into(),
        };
        let mut conn = store.connection()?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?;
        info!(path = %store.db_path, "SQLite store ready");
        Ok(store)
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Reads the value stored under `key`. Returns `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn read(&self, key: &str) -> Result<Option<String>, DbError> {
        let mut conn = self.connection()?;
        let value = schema::kv_store::table
            .find(key)
            .select(schema::kv_store::value)
            .first::<String>(&mut conn)
            .optional()?;
        debug!(found = value.is_some(), "Read key");
        Ok(value)
    }

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, value))]
    pub fn write(&self, key: &str, value: &str) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        diesel::replace_into(schema::kv_store::table)
            .values(&KvEntry::new(key, value))
            .execute(&mut conn)?;
        debug!("Wrote key");
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let store = self.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || store.read(&key))
            .await
            .map_err(|e| StoreError::new(format!("Read task failed: {}", e)))?
            .map_err(StoreError::from)
    }

    async fn set(&self, key: &str, blob: String) -> Result<(), StoreError> {
        let store = self.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || store.write(&key, &blob))
            .await
            .map_err(|e| StoreError::new(format!("Write task failed: {}", e)))?
            .map_err(StoreError::from)
    }
}

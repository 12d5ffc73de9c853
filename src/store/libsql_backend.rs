//! libSQL backend: async `FlagStore` implementation.
//!
//! Supports local file and in-memory databases.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{info, warn};

use crate::error::StoreError;
use crate::store::migrations;
use crate::store::traits::FlagStore;

/// libSQL flag store.
///
/// Stores a single connection that is reused for all operations.
pub struct LibSqlFlagStore {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlFlagStore {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Connection(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to open libSQL database: {e}")))?;

        let store = Self::from_database(db).await?;
        info!(path = %path.display(), "Flag store opened");
        Ok(store)
    }

    /// Create an in-memory database (for tests and ephemeral hosts).
    pub async fn new_memory() -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                StoreError::Connection(format!("Failed to create in-memory database: {e}"))
            })?;

        Self::from_database(db).await
    }

    async fn from_database(db: LibSqlDatabase) -> Result<Self, StoreError> {
        let conn = db
            .connect()
            .map_err(|e| StoreError::Connection(format!("Failed to create connection: {e}")))?;

        migrations::run_migrations(&conn).await?;

        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

#[async_trait]
impl FlagStore for LibSqlFlagStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let mut rows = self
            .conn()
            .query("SELECT value FROM flags WHERE key = ?1", params![key])
            .await
            .map_err(|e| StoreError::Query(format!("get_flag: {e}")))?;

        let row = match rows.next().await {
            Ok(Some(row)) => row,
            Ok(None) => return Ok(None),
            Err(e) => return Err(StoreError::Query(format!("get_flag: {e}"))),
        };

        let raw: String = row
            .get(0)
            .map_err(|e| StoreError::Query(format!("get_flag: {e}")))?;

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key = key, error = %e, "Corrupt flag value, treating as absent");
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        let value_str =
            serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))?;

        self.conn()
            .execute(
                "INSERT INTO flags (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT (key) DO UPDATE SET value = ?2, updated_at = ?3",
                params![key, value_str, now],
            )
            .await
            .map_err(|e| StoreError::Query(format!("set_flag: {e}")))?;

        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<bool, StoreError> {
        let count = self
            .conn()
            .execute("DELETE FROM flags WHERE key = ?1", params![key])
            .await
            .map_err(|e| StoreError::Query(format!("clear_flag: {e}")))?;
        Ok(count > 0)
    }
}

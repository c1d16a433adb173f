//! Namespaced key-value slots backed by SQLite.
//!
//! Two independent namespaces live here: the host application's slots
//! (`activeChatId`, `activeModel`, read-only to this system) and our own
//! (`pdfToAttach`). See [`crate::NS_HOST`] and [`crate::NS_ATTACH`].

use crate::error::StorageError;
use crate::sqlite_pool::SqlitePoolManager;
use tracing::debug;

#[derive(Clone)]
pub struct KvStore {
    pool_manager: SqlitePoolManager,
}

impl KvStore {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        Self::with_pool(pool_manager).await
    }

    /// Builds a store over an existing pool, creating the schema if absent.
    pub async fn with_pool(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let store = Self { pool_manager };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_slots (
                ns TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                PRIMARY KEY (ns, key)
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn get(&self, ns: &str, key: &str) -> Result<Option<String>, StorageError> {
        let pool = self.pool_manager.pool();

        let value: Option<(String,)> =
            sqlx::query_as("SELECT value FROM kv_slots WHERE ns = ? AND key = ?")
                .bind(ns)
                .bind(key)
                .fetch_optional(pool)
                .await?;

        Ok(value.map(|v| v.0))
    }

    /// Writes a slot, overwriting any prior value (last-write-wins).
    pub async fn set(&self, ns: &str, key: &str, value: &str) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query("INSERT OR REPLACE INTO kv_slots (ns, key, value) VALUES (?, ?, ?)")
            .bind(ns)
            .bind(key)
            .bind(value)
            .execute(pool)
            .await?;

        debug!(ns = %ns, key = %key, "Set kv slot");
        Ok(())
    }

    /// Reads and clears a slot in one statement, so two concurrent takes can
    /// never observe the same value.
    pub async fn take(&self, ns: &str, key: &str) -> Result<Option<String>, StorageError> {
        let pool = self.pool_manager.pool();

        let value: Option<(String,)> =
            sqlx::query_as("DELETE FROM kv_slots WHERE ns = ? AND key = ? RETURNING value")
                .bind(ns)
                .bind(key)
                .fetch_optional(pool)
                .await?;

        Ok(value.map(|v| v.0))
    }
}

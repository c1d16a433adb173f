//! Document repository: persistence and queries for captured documents.
//!
//! Uses SqlitePoolManager and the DocumentRecord model. Ids are assigned by
//! SQLite at insertion (monotonic rowids); records are immutable once written.

use crate::error::StorageError;
use crate::models::DocumentRecord;
use crate::sqlite_pool::SqlitePoolManager;
use chrono::Utc;
use tracing::info;

#[derive(Clone)]
pub struct DocumentRepository {
    pool_manager: SqlitePoolManager,
}

impl DocumentRepository {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        Self::with_pool(pool_manager).await
    }

    /// Builds a repository over an existing pool, creating the schema if absent.
    pub async fn with_pool(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating documents table if not exists");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                filename TEXT NOT NULL,
                content_base64 TEXT NOT NULL,
                chat_id TEXT NOT NULL,
                model TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_documents_chat_id ON documents(chat_id);
            CREATE INDEX IF NOT EXISTS idx_documents_created_at ON documents(created_at);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Inserts a new document and returns its store-assigned id.
    pub async fn put(
        &self,
        filename: &str,
        content_base64: &str,
        chat_id: &str,
        model: Option<&str>,
    ) -> Result<i64, StorageError> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query(
            r#"
            INSERT INTO documents (filename, content_base64, chat_id, model, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(filename)
        .bind(content_base64)
        .bind(chat_id)
        .bind(model)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(
            document_id = id,
            filename = %filename,
            chat_id = %chat_id,
            "Stored document"
        );
        Ok(id)
    }

    /// Returns all documents for a chat, newest first.
    pub async fn get_all_for_chat(
        &self,
        chat_id: &str,
    ) -> Result<Vec<DocumentRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let documents: Vec<DocumentRecord> = sqlx::query_as(
            "SELECT * FROM documents WHERE chat_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(chat_id)
        .fetch_all(pool)
        .await?;

        info!(
            chat_id = %chat_id,
            count = documents.len(),
            "Retrieved documents for chat"
        );
        Ok(documents)
    }

    /// Returns the most recently captured document for a chat.
    ///
    /// Selection is deterministic: highest `created_at`, then highest id.
    pub async fn latest_for_chat(
        &self,
        chat_id: &str,
    ) -> Result<Option<DocumentRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let document = sqlx::query_as::<_, DocumentRecord>(
            "SELECT * FROM documents WHERE chat_id = ? ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .bind(chat_id)
        .fetch_optional(pool)
        .await?;

        Ok(document)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<DocumentRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let document = sqlx::query_as::<_, DocumentRecord>("SELECT * FROM documents WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(document)
    }

    /// Deletes a document. Idempotent: deleting a missing id is not an error.
    /// Returns whether a row was actually removed.
    pub async fn delete(&self, id: i64) -> Result<bool, StorageError> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        info!(document_id = id, deleted = deleted, "Deleted document");
        Ok(deleted)
    }

    pub async fn count_for_chat(&self, chat_id: &str) -> Result<i64, StorageError> {
        let pool = self.pool_manager.pool();

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM documents WHERE chat_id = ?")
            .bind(chat_id)
            .fetch_one(pool)
            .await?;

        Ok(count.0)
    }
}

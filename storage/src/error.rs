//! Storage error types.
//!
//! Used by the repositories and by callers of storage APIs.

use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<StorageError> for attach_core::AttachError {
    fn from(err: StorageError) -> Self {
        attach_core::AttachError::Storage(err.to_string())
    }
}

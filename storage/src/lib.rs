//! Storage crate: document persistence and key-value slots.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – DocumentRecord
//! - [`document_repo`] – DocumentRepository (SQLite)
//! - [`kv_store`] – KvStore, namespaced key-value slots
//! - [`pending_flag`] – PendingFlag, the single pdfToAttach slot
//! - [`sqlite_pool`] – SqlitePoolManager

mod document_repo;
mod error;
mod kv_store;
mod models;
mod pending_flag;
mod sqlite_pool;


pub use document_repo::DocumentRepository;
pub use error::StorageError;
pub use kv_store::KvStore;
pub use models::DocumentRecord;
pub use pending_flag::PendingFlag;
pub use sqlite_pool::SqlitePoolManager;

/// Namespace for slots owned by the host application (read-only to us).
pub const NS_HOST: &str = "host";
/// Namespace for slots owned by this system.
pub const NS_ATTACH: &str = "attach";

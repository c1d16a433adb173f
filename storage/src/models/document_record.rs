//! Document record model for persistence.
//!
//! Maps to the `documents` table and is used by DocumentRepository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A captured PDF plus metadata, persisted for later attachment.
///
/// `id` is assigned by the store at insertion and never changes; a record is
/// never mutated after creation, only deleted. `content_base64` is the PDF
/// bytes encoded as base64 text.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DocumentRecord {
    pub id: i64,
    pub filename: String,
    pub content_base64: String,
    pub chat_id: String,
    /// Model active at capture time; informational only.
    pub model: Option<String>,
    pub created_at: DateTime<Utc>,
}

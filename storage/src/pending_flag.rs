//! The pending-attachment flag: a single persistent slot recording "the next
//! outbound call for chat X must carry a document".

use crate::error::StorageError;
use crate::kv_store::KvStore;
use crate::NS_ATTACH;
use tracing::info;

const FLAG_KEY: &str = "pdfToAttach";

/// Single-slot marker with set/take semantics.
///
/// `set` overwrites any prior value, for the same or a different chat: an
/// unconsumed earlier intent is silently dropped. `take_if_present` reads and
/// clears in one storage step, so a document can never be attached to more
/// than one outbound request.
#[derive(Clone)]
pub struct PendingFlag {
    kv: KvStore,
}

impl PendingFlag {
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    /// Records intent for the given chat, overwriting any prior value.
    pub async fn set(&self, chat_id: &str) -> Result<(), StorageError> {
        self.kv.set(NS_ATTACH, FLAG_KEY, chat_id).await?;
        info!(chat_id = %chat_id, "Pending attachment flag set");
        Ok(())
    }

    /// Returns the flagged chat id and clears the slot; a second call before
    /// a new `set` observes absence.
    pub async fn take_if_present(&self) -> Result<Option<String>, StorageError> {
        let taken = self.kv.take(NS_ATTACH, FLAG_KEY).await?;
        if let Some(ref chat_id) = taken {
            info!(chat_id = %chat_id, "Pending attachment flag consumed");
        }
        Ok(taken)
    }

    /// Non-consuming read, for UI state and tests.
    pub async fn peek(&self) -> Result<Option<String>, StorageError> {
        self.kv.get(NS_ATTACH, FLAG_KEY).await
    }
}

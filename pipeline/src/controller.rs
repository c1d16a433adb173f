//! The attachment lifecycle controller.

use std::sync::Arc;

use tracing::{error, info, instrument};

use attach_core::{AttachError, ContextProvider, Result, UiNotifier};
use storage::{DocumentRepository, PendingFlag};

use crate::capture::{encode_content, validate_pdf};

/// Orchestrates capture → store → flag → notify, and removal.
///
/// A capture attempt moves Idle → Capturing → Stored → Pending; the
/// interceptor later consumes the flag. Any failure reports to the UI
/// collaborator and returns the attempt to Idle; a new capture restarts the
/// machine.
#[derive(Clone)]
pub struct AttachmentController {
    documents: DocumentRepository,
    flag: PendingFlag,
    context: Arc<dyn ContextProvider>,
    notifier: Arc<dyn UiNotifier>,
}

impl AttachmentController {
    pub fn new(
        documents: DocumentRepository,
        flag: PendingFlag,
        context: Arc<dyn ContextProvider>,
        notifier: Arc<dyn UiNotifier>,
    ) -> Self {
        Self {
            documents,
            flag,
            context,
            notifier,
        }
    }

    /// Captures a user-selected file: validates, encodes, stores it under the
    /// active chat, and flags it for the next outbound provider call.
    /// Returns the stored document's id.
    #[instrument(skip(self, bytes), fields(filename = %filename, size = bytes.len()))]
    pub async fn capture(&self, filename: &str, bytes: &[u8]) -> Result<i64> {
        if let Err(e) = validate_pdf(filename, bytes) {
            error!(error = %e, "Capture rejected");
            self.notifier.attachment_failed(&e.to_string()).await;
            return Err(e.into());
        }

        let content_base64 = encode_content(bytes);
        let context = self.context.resolve_context().await;

        let id = match self
            .documents
            .put(
                filename,
                &content_base64,
                &context.chat_id,
                Some(&context.model),
            )
            .await
        {
            Ok(id) => id,
            Err(e) => {
                error!(error = %e, "Failed to store document");
                self.notifier
                    .attachment_failed(&format!("Could not save {}", filename))
                    .await;
                return Err(e.into());
            }
        };

        if let Err(e) = self.flag.set(&context.chat_id).await {
            error!(error = %e, document_id = id, "Failed to set pending flag");
            self.notifier
                .attachment_failed(&format!("Could not mark {} for sending", filename))
                .await;
            return Err(e.into());
        }

        info!(
            document_id = id,
            chat_id = %context.chat_id,
            model = %context.model,
            "Attachment stored and pending"
        );
        self.notifier
            .attachment_stored(id, filename, &context.chat_id)
            .await;
        Ok(id)
    }

    /// Removes a stored document at the user's request.
    ///
    /// The flag is deliberately left in place: if it was pending, the next
    /// matching outbound call finds no document and sends unmodified.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: i64) -> Result<()> {
        let deleted = self.documents.delete(id).await.map_err(AttachError::from)?;
        if deleted {
            self.notifier.attachment_removed(id).await;
        }
        Ok(())
    }

    /// Documents currently stored for a chat, newest first (for chip state).
    pub async fn documents_for_chat(
        &self,
        chat_id: &str,
    ) -> Result<Vec<storage::DocumentRecord>> {
        Ok(self.documents.get_all_for_chat(chat_id).await?)
    }
}

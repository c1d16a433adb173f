//! Default UI notifier: logs what a real UI collaborator would render.

use async_trait::async_trait;
use tracing::{info, warn};

use attach_core::UiNotifier;

/// Stand-in for the chip/toast layer; useful headless and in the CLI.
#[derive(Debug, Clone, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl UiNotifier for LoggingNotifier {
    async fn attachment_stored(&self, id: i64, filename: &str, chat_id: &str) {
        info!(
            document_id = id,
            filename = %filename,
            chat_id = %chat_id,
            "Attachment ready for next send"
        );
    }

    async fn attachment_removed(&self, id: i64) {
        info!(document_id = id, "Attachment removed");
    }

    async fn attachment_failed(&self, message: &str) {
        warn!(message = %message, "Attachment failed");
    }
}

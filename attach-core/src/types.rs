//! Core types: chat context, outbound request/response, and the seam traits.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The conversation and model the host application currently has active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatContext {
    pub chat_id: String,
    pub model: String,
}

/// An outbound request as seen by the interceptor: destination URL plus an
/// optional textual body (JSON for provider calls, arbitrary otherwise).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundRequest {
    pub url: String,
    pub body: Option<String>,
}

impl OutboundRequest {
    pub fn new(url: impl Into<String>, body: Option<String>) -> Self {
        Self {
            url: url.into(),
            body,
        }
    }
}

/// Response returned by a [`Transport`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// The "next" delegate the interceptor wraps: whatever actually delivers the
/// request (the host page's network layer, an HTTP client, a test double).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> crate::error::Result<TransportResponse>;
}

/// Read-only lookup of the host application's active chat and model.
///
/// Implementations must not fail: when host state is missing they substitute
/// a synthesized chat id and the literal `"unknown"` model, so the pipeline
/// never blocks on absent host state.
#[async_trait]
pub trait ContextProvider: Send + Sync {
    async fn resolve_context(&self) -> ChatContext;
}

/// Boundary to the UI collaborator (button, chip, toast). The core only
/// reports outcomes; visuals are entirely the collaborator's concern.
#[async_trait]
pub trait UiNotifier: Send + Sync {
    /// A document was persisted and flagged for the next outbound call.
    async fn attachment_stored(&self, id: i64, filename: &str, chat_id: &str);

    /// A pending document was removed by the user (soft-cancel).
    async fn attachment_removed(&self, id: i64);

    /// A capture or storage failure the user should see.
    async fn attachment_failed(&self, message: &str);
}

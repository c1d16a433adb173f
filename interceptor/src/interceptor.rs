//! The request interceptor: decorator over a [`Transport`] "next" delegate.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use attach_core::{OutboundRequest, Result, Transport, TransportResponse};
use storage::{DocumentRepository, PendingFlag};

use crate::providers::Provider;

/// Sits in front of the real network call. For destinations matching a known
/// AI-provider endpoint it resolves the pending flag, loads the flagged
/// chat's newest document, and splices it into the payload before
/// delegating; everything else passes through untouched.
///
/// Any failure after the flag is taken forwards the original request: the
/// intent is lost, not retried, and the user's message still goes out.
#[derive(Clone)]
pub struct RequestInterceptor {
    next: Arc<dyn Transport>,
    documents: DocumentRepository,
    flag: PendingFlag,
}

impl RequestInterceptor {
    pub fn new(next: Arc<dyn Transport>, documents: DocumentRepository, flag: PendingFlag) -> Self {
        Self {
            next,
            documents,
            flag,
        }
    }

    /// Inspects one outbound request and delegates it, mutated or not.
    #[instrument(skip(self, request), fields(url = %request.url))]
    pub async fn send(&self, request: OutboundRequest) -> Result<TransportResponse> {
        let provider = match Provider::from_url(&request.url) {
            Some(provider) => provider,
            None => {
                // Non-provider destination: pass through, flag untouched.
                debug!("Destination not a provider endpoint, delegating unchanged");
                return self.next.send(request).await;
            }
        };

        // Take-and-clear: at most one request ever sees this flag value.
        let chat_id = match self.flag.take_if_present().await {
            Ok(Some(chat_id)) => chat_id,
            Ok(None) => {
                debug!(provider = ?provider, "No pending attachment, delegating unchanged");
                return self.next.send(request).await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read pending flag, delegating unchanged");
                return self.next.send(request).await;
            }
        };

        match self.mutated_body(provider, &chat_id, request.body.as_deref()).await {
            Some(body) => {
                info!(
                    provider = ?provider,
                    chat_id = %chat_id,
                    "Attached pending document to outbound request"
                );
                self.next
                    .send(OutboundRequest {
                        url: request.url,
                        body: Some(body),
                    })
                    .await
            }
            // The flag is already consumed; the original request still goes out.
            None => self.next.send(request).await,
        }
    }

    /// Builds the mutated body, or `None` when the attachment must be skipped
    /// (no document, unparseable body, schema mismatch). Skips are logged,
    /// never propagated.
    async fn mutated_body(
        &self,
        provider: Provider,
        chat_id: &str,
        body: Option<&str>,
    ) -> Option<String> {
        let document = match self.documents.latest_for_chat(chat_id).await {
            Ok(Some(document)) => document,
            Ok(None) => {
                // Soft-cancel: the document was deleted while the flag was
                // still pending.
                info!(chat_id = %chat_id, "No stored document for pending flag, skipping attachment");
                return None;
            }
            Err(e) => {
                warn!(chat_id = %chat_id, error = %e, "Document lookup failed, skipping attachment");
                return None;
            }
        };

        let raw = match body {
            Some(raw) => raw,
            None => {
                warn!("Provider request has no body, skipping attachment");
                return None;
            }
        };

        let mut parsed: serde_json::Value = match serde_json::from_str(raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Request body is not valid JSON, forwarding original");
                return None;
            }
        };

        if let Err(e) = provider.attach_document(&mut parsed, &document) {
            warn!(error = %e, "Payload mutation failed, forwarding original");
            return None;
        }

        match serde_json::to_string(&parsed) {
            Ok(serialized) => Some(serialized),
            Err(e) => {
                warn!(error = %e, "Failed to re-serialize mutated body, forwarding original");
                None
            }
        }
    }
}

//! # host-context
//!
//! Resolves which conversation and model a newly captured file belongs to by
//! reading the host application's key-value slots. The read is a point-in-time
//! snapshot with no subscription to future changes, and it never fails: when
//! host state is missing the resolver substitutes a time-based chat id and the
//! literal `"unknown"` model, so captures never block on absent host state
//! (at the cost of fragmenting attachments across synthesized ids).

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use attach_core::{ChatContext, ContextProvider};
use storage::{KvStore, NS_HOST};

const KEY_ACTIVE_CHAT_ID: &str = "activeChatId";
const KEY_ACTIVE_MODEL: &str = "activeModel";

const UNKNOWN_MODEL: &str = "unknown";

/// Reads `activeChatId` / `activeModel` from the host-owned namespace.
#[derive(Clone)]
pub struct HostContextResolver {
    kv: KvStore,
}

impl HostContextResolver {
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    fn synthesized_chat_id() -> String {
        format!("chat-{}", Utc::now().timestamp_millis())
    }
}

#[async_trait]
impl ContextProvider for HostContextResolver {
    async fn resolve_context(&self) -> ChatContext {
        // Storage errors and missing keys both default; the caller never sees
        // host-state unavailability.
        let chat_id = match self.kv.get(NS_HOST, KEY_ACTIVE_CHAT_ID).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                debug!("No active chat id in host state, synthesizing one");
                Self::synthesized_chat_id()
            }
            Err(e) => {
                debug!(error = %e, "Host state unavailable, synthesizing chat id");
                Self::synthesized_chat_id()
            }
        };

        let model = match self.kv.get(NS_HOST, KEY_ACTIVE_MODEL).await {
            Ok(Some(model)) => model,
            Ok(None) | Err(_) => UNKNOWN_MODEL.to_string(),
        };

        ChatContext { chat_id, model }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_kv() -> KvStore {
        KvStore::new("sqlite::memory:")
            .await
            .expect("Failed to create kv store")
    }

    #[tokio::test]
    async fn test_resolves_host_state() {
        let kv = memory_kv().await;
        kv.set(NS_HOST, KEY_ACTIVE_CHAT_ID, "c42").await.unwrap();
        kv.set(NS_HOST, KEY_ACTIVE_MODEL, "claude-3-5-sonnet")
            .await
            .unwrap();

        let resolver = HostContextResolver::new(kv);
        let context = resolver.resolve_context().await;

        assert_eq!(context.chat_id, "c42");
        assert_eq!(context.model, "claude-3-5-sonnet");
    }

    #[tokio::test]
    async fn test_missing_state_falls_back() {
        let resolver = HostContextResolver::new(memory_kv().await);

        let context = resolver.resolve_context().await;

        assert!(context.chat_id.starts_with("chat-"));
        assert_eq!(context.model, "unknown");
    }

    #[tokio::test]
    async fn test_partial_state_defaults_model_only() {
        let kv = memory_kv().await;
        kv.set(NS_HOST, KEY_ACTIVE_CHAT_ID, "c42").await.unwrap();

        let resolver = HostContextResolver::new(kv);
        let context = resolver.resolve_context().await;

        assert_eq!(context.chat_id, "c42");
        assert_eq!(context.model, "unknown");
    }
}

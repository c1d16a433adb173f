//! Integration tests for [`interceptor::RequestInterceptor`].
//!
//! Covers: provider matching, exactly-once flag consumption, the Anthropic
//! and Gemini mutation shapes, and the forward-original rules (no flag, no
//! document, malformed body) using an in-memory SQLite database and a mock
//! transport that records what was actually delegated.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use attach_core::{OutboundRequest, Result, Transport, TransportResponse};
use interceptor::RequestInterceptor;
use storage::{DocumentRepository, KvStore, PendingFlag, SqlitePoolManager};

/// Records every request it is asked to deliver and answers 200.
#[derive(Default)]
struct MockTransport {
    sent: Mutex<Vec<OutboundRequest>>,
}

impl MockTransport {
    fn sent(&self) -> Vec<OutboundRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse> {
        self.sent.lock().unwrap().push(request);
        Ok(TransportResponse {
            status: 200,
            body: "{}".to_string(),
        })
    }
}

struct Fixture {
    transport: Arc<MockTransport>,
    documents: DocumentRepository,
    flag: PendingFlag,
    interceptor: RequestInterceptor,
}

async fn fixture() -> Fixture {
    let pool = SqlitePoolManager::new("sqlite::memory:")
        .await
        .expect("Failed to create pool");
    let documents = DocumentRepository::with_pool(pool.clone())
        .await
        .expect("Failed to create repository");
    let kv = KvStore::with_pool(pool)
        .await
        .expect("Failed to create kv store");
    let flag = PendingFlag::new(kv);

    let transport = Arc::new(MockTransport::default());
    let interceptor =
        RequestInterceptor::new(transport.clone(), documents.clone(), flag.clone());

    Fixture {
        transport,
        documents,
        flag,
        interceptor,
    }
}

const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const GEMINI_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

/// **Test: the capture→flag→send scenario attaches exactly once.**
///
/// **Setup:** Store `report.pdf` for chat `c1`, set the flag.
/// **Action:** Send a provider request with a one-message body, then a second
/// identical request.
/// **Expected:** First delegated body carries an appended document message
/// with `media_type: application/pdf`; flag is then absent; second request is
/// forwarded unmodified.
#[tokio::test]
async fn test_attaches_to_next_provider_call_exactly_once() {
    let f = fixture().await;

    f.documents
        .put("report.pdf", "JVBERi0xLjQ=", "c1", None)
        .await
        .unwrap();
    f.flag.set("c1").await.unwrap();

    let body = r#"{"messages":[{"role":"user","content":"hi"}]}"#;
    f.interceptor
        .send(OutboundRequest::new(ANTHROPIC_URL, Some(body.to_string())))
        .await
        .unwrap();

    let sent = f.transport.sent();
    assert_eq!(sent.len(), 1);
    let delivered: Value = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
    let messages = delivered["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["content"], "hi");
    assert_eq!(messages[1]["content"][0]["type"], "document");
    assert_eq!(
        messages[1]["content"][0]["source"]["media_type"],
        "application/pdf"
    );
    assert_eq!(
        messages[1]["content"][0]["source"]["data"],
        "JVBERi0xLjQ="
    );

    assert_eq!(f.flag.peek().await.unwrap(), None);

    // Same destination again: nothing pending, forwarded unmodified.
    f.interceptor
        .send(OutboundRequest::new(ANTHROPIC_URL, Some(body.to_string())))
        .await
        .unwrap();
    let sent = f.transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].body.as_deref(), Some(body));
}

/// **Test: non-provider destinations never consume the flag or touch the body.**
#[tokio::test]
async fn test_non_provider_call_leaves_flag_and_body_alone() {
    let f = fixture().await;

    f.documents.put("a.pdf", "QQ==", "c1", None).await.unwrap();
    f.flag.set("c1").await.unwrap();

    let body = r#"{"telemetry":true}"#;
    f.interceptor
        .send(OutboundRequest::new(
            "https://example.com/api/telemetry",
            Some(body.to_string()),
        ))
        .await
        .unwrap();

    let sent = f.transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body.as_deref(), Some(body));
    assert_eq!(f.flag.peek().await.unwrap().as_deref(), Some("c1"));
}

/// **Test: a provider call with no pending flag is forwarded byte-for-byte.**
#[tokio::test]
async fn test_no_flag_forwards_unmodified() {
    let f = fixture().await;

    let body = r#"{"messages":[]}"#;
    f.interceptor
        .send(OutboundRequest::new(ANTHROPIC_URL, Some(body.to_string())))
        .await
        .unwrap();

    assert_eq!(f.transport.sent()[0].body.as_deref(), Some(body));
}

/// **Test: soft-cancel — document deleted while the flag is pending.**
///
/// **Setup:** Store and flag a document for `c1`, then delete the document.
/// **Action:** Send a provider request.
/// **Expected:** Forwarded unmodified; the flag is consumed, not retried.
#[tokio::test]
async fn test_deleted_document_degrades_to_unmodified_forward() {
    let f = fixture().await;

    let id = f.documents.put("a.pdf", "QQ==", "c1", None).await.unwrap();
    f.flag.set("c1").await.unwrap();
    f.documents.delete(id).await.unwrap();

    let body = r#"{"messages":[{"role":"user","content":"hi"}]}"#;
    f.interceptor
        .send(OutboundRequest::new(ANTHROPIC_URL, Some(body.to_string())))
        .await
        .unwrap();

    assert_eq!(f.transport.sent()[0].body.as_deref(), Some(body));
    assert_eq!(f.flag.peek().await.unwrap(), None);
}

/// **Test: an unparseable body is forwarded exactly as-is.**
#[tokio::test]
async fn test_malformed_body_forwards_original() {
    let f = fixture().await;

    f.documents.put("a.pdf", "QQ==", "c1", None).await.unwrap();
    f.flag.set("c1").await.unwrap();

    let body = "this is not json {";
    f.interceptor
        .send(OutboundRequest::new(ANTHROPIC_URL, Some(body.to_string())))
        .await
        .unwrap();

    let sent = f.transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body.as_deref(), Some(body));
    // A malformed mutation still consumes the intent.
    assert_eq!(f.flag.peek().await.unwrap(), None);
}

/// **Test: a missing messages array is initialized before appending.**
#[tokio::test]
async fn test_missing_messages_array_is_created() {
    let f = fixture().await;

    f.documents.put("a.pdf", "QQ==", "c1", None).await.unwrap();
    f.flag.set("c1").await.unwrap();

    f.interceptor
        .send(OutboundRequest::new(
            ANTHROPIC_URL,
            Some(r#"{"model":"claude-3-5-sonnet"}"#.to_string()),
        ))
        .await
        .unwrap();

    let delivered: Value =
        serde_json::from_str(f.transport.sent()[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(delivered["model"], "claude-3-5-sonnet");
    assert_eq!(delivered["messages"].as_array().unwrap().len(), 1);
}

/// **Test: Gemini destinations get the contents/parts shape.**
#[tokio::test]
async fn test_gemini_mutation_shape() {
    let f = fixture().await;

    f.documents
        .put("report.pdf", "JVBERi0xLjQ=", "c1", None)
        .await
        .unwrap();
    f.flag.set("c1").await.unwrap();

    f.interceptor
        .send(OutboundRequest::new(
            GEMINI_URL,
            Some(json!({ "contents": [] }).to_string()),
        ))
        .await
        .unwrap();

    let delivered: Value =
        serde_json::from_str(f.transport.sent()[0].body.as_deref().unwrap()).unwrap();
    let contents = delivered["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 1);
    assert_eq!(contents[0]["role"], "user");
    assert_eq!(contents[0]["parts"][0]["type"], "document");
}

/// **Test: with several documents for a chat, the newest is attached.**
#[tokio::test]
async fn test_latest_document_wins() {
    let f = fixture().await;

    f.documents.put("old.pdf", "QQ==", "c1", None).await.unwrap();
    f.documents.put("new.pdf", "Qg==", "c1", None).await.unwrap();
    f.flag.set("c1").await.unwrap();

    f.interceptor
        .send(OutboundRequest::new(
            ANTHROPIC_URL,
            Some(r#"{"messages":[]}"#.to_string()),
        ))
        .await
        .unwrap();

    let delivered: Value =
        serde_json::from_str(f.transport.sent()[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(
        delivered["messages"][0]["content"][0]["source"]["data"],
        "Qg=="
    );
}

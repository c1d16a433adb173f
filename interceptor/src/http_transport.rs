//! Production transport: delivers requests over HTTP with reqwest.

use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use attach_core::{AttachError, OutboundRequest, Result, Transport, TransportResponse};

/// POSTs the request body (as JSON text) to the destination URL.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse> {
        info!(url = %request.url, "Sending outbound request");

        let mut builder = self.client.post(&request.url);
        if let Some(body) = request.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AttachError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AttachError::Transport(e.to_string()))?;

        Ok(TransportResponse { status, body })
    }
}

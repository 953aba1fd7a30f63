//! Network seam between the provider client and the provider API.

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::request::ResponsesRequest;

/// Raw answer of one attempt.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,

    /// Canonical reason phrase for the status, if any.
    pub reason: Option<String>,

    /// Response body, when it was valid JSON.
    pub body: Option<serde_json::Value>,
}

impl TransportResponse {
    /// Returns true for 2xx answers.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues one structured-generation request.
///
/// Implementations return [`ProviderError::Transport`] only when no response
/// was received at all; every HTTP answer is a [`TransportResponse`].
#[async_trait]
pub trait ResponsesTransport: Send + Sync {
    async fn send(&self, request: &ResponsesRequest) -> Result<TransportResponse>;
}

/// reqwest-backed transport for a Responses-style endpoint.
#[derive(Clone)]
pub struct HttpTransport {
    /// Base URL, e.g. `https://api.openai.com/v1`.
    base_url: String,

    /// Bearer token.
    api_key: String,

    /// HTTP client.
    http_client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport against `base_url`.
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            http_client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/responses", self.base_url)
    }
}

#[async_trait]
impl ResponsesTransport for HttpTransport {
    async fn send(&self, request: &ResponsesRequest) -> Result<TransportResponse> {
        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Transport {
                message: e.to_string(),
                model: Some(request.model.clone()),
            })?;

        let status = response.status();
        let body = response.json::<serde_json::Value>().await.ok();

        Ok(TransportResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            body,
        })
    }
}

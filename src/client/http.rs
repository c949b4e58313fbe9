//! `reqwest`-backed assistant client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use super::{AssistantClient, ChatRequest, ChatResponse, ClientError, HealthStatus};

/// Talks JSON over HTTP to the assistant service.
///
/// No request timeout is applied unless one is configured; the transport
/// default then decides how long a stalled request may hang.
#[derive(Debug, Clone)]
pub struct HttpAssistantClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpAssistantClient {
    /// Create a client for `endpoint` with no request timeout.
    pub fn new(endpoint: &str) -> Result<Self, ClientError> {
        Self::with_timeout(endpoint, None)
    }

    /// Create a client, optionally bounding every request by `timeout`.
    pub fn with_timeout(endpoint: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| ClientError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// `/health` on the same origin as the chat endpoint.
    pub fn health_url(&self) -> Result<Url, ClientError> {
        self.endpoint
            .join("/health")
            .map_err(|e| ClientError::InvalidEndpoint(e.to_string()))
    }
}

#[async_trait]
impl AssistantClient for HttpAssistantClient {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        debug!(endpoint = %self.endpoint, conversation_id = %request.conversation_id, "POST chat");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let reply: ChatResponse = serde_json::from_str(&body)?;
        debug!(
            suggestions = reply.suggestions.len(),
            gifts = reply.gifts.len(),
            "Chat reply decoded"
        );
        Ok(reply)
    }

    async fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = self.health_url()?;
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

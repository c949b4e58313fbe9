//! Assistant service client.
//!
//! The remote assistant is an external collaborator: the session controller
//! only sees the [`AssistantClient`] trait, so tests can drive it with a
//! scripted fake while the binary uses [`HttpAssistantClient`].

mod http;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::session::GiftSuggestion;

pub use http::HttpAssistantClient;

/// Body of `POST <endpoint>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_id: String,
}

/// Successful reply from the assistant service.
///
/// `reply` is required; a body without it fails to decode and is reported
/// as [`ClientError::Malformed`]. Missing or `null` lists are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub suggestions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub gifts: Vec<GiftSuggestion>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ChatResponse {
    pub fn text(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            ..Default::default()
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Why a request produced no usable reply.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Assistant service returned status {0}")]
    Status(u16),
    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// The outbound side of a conversation.
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Send one user message and wait for the assistant's reply.
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError>;

    /// Probe the service's health endpoint.
    async fn health(&self) -> Result<HealthStatus, ClientError>;
}

#[async_trait]
impl<T: AssistantClient + ?Sized> AssistantClient for std::sync::Arc<T> {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        (**self).send(request).await
    }

    async fn health(&self) -> Result<HealthStatus, ClientError> {
        (**self).health().await
    }
}

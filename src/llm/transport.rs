//! Chat-completion wire types and the HTTP transport.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::CompletionError;

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One role-tagged message in a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            name: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            name: None,
        }
    }
}

/// A chat-completion request. Built fresh per call, never mutated after send.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: usize,
    pub temperature: f32,
    pub top_p: f32,
    pub stream: bool,
    pub n: u8,
}

/// Token accounting reported by the backend for one request.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Usage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

/// A chat-completion response: generated choices plus usage counts.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Usage,
}

/// Error body returned by OpenAI-compatible endpoints.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// One round trip to a completion backend.
///
/// The single seam between the pipeline and the network; tests substitute
/// scripted implementations.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, CompletionError>;
}

/// reqwest-backed transport for OpenAI-compatible `/chat/completions`
/// endpoints.
pub struct OpenAiTransport {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

impl OpenAiTransport {
    pub fn new(api: ApiConfig) -> Result<Self, CompletionError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(CompletionError::Transport)?;
        Ok(Self {
            http,
            api_key: api.api_key,
            base_url: api.base_url,
        })
    }
}

#[async_trait]
impl ChatTransport for OpenAiTransport {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %request.model, messages = request.messages.len(), "sending completion request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(CompletionError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|parsed| parsed.error.message)
                .unwrap_or(body);
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(CompletionError::Transport)
    }
}

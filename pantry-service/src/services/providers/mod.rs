//! Chat-completion provider abstractions and implementations.
//!
//! Handlers only see [`ChatProvider`], so the hosted model (Groq in
//! production, Gemini for diagnostics, a mock in tests) can be swapped
//! without touching request handling.

pub mod gemini;
pub mod groq;
pub mod mock;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Model returned no content")]
    EmptyResponse,
}

impl ProviderError {
    /// HTTP status reported by the provider, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Api { status, .. } => Some(*status),
            ProviderError::RateLimited(_) => Some(429),
            _ => None,
        }
    }
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One piece of a multi-part message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    ImageUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// User message carrying an instruction and an image reference.
    ///
    /// The URL is forwarded as-is; the provider fetches it.
    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(vec![
                ContentPart::Text(text.into()),
                ContentPart::ImageUrl(image_url.into()),
            ]),
        }
    }
}

/// Generation parameters for completion requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationParams {
    /// Sampling temperature (0.0 - 1.0).
    pub temperature: Option<f32>,

    /// Maximum output tokens.
    pub max_tokens: Option<u32>,

    /// Ask the provider to emit a JSON object only.
    pub json_mode: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub params: GenerationParams,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            params: GenerationParams::default(),
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }
}

/// Trait for chat-completion providers (e.g., Groq).
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name used in logs.
    fn name(&self) -> &'static str;

    /// Send the request and return the first choice's text content.
    async fn complete(&self, request: &ChatRequest) -> Result<String, ProviderError>;
}

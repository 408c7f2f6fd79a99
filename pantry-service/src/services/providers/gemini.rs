//! Gemini AI provider implementation.
//!
//! Text-only generation through Google's `generateContent` endpoint. Used by
//! the diagnostics binary to verify the Google key.

use super::{ChatProvider, ChatRequest, ContentPart, MessageContent, ProviderError, Role};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini text provider.
pub struct GeminiProvider {
    api_key: Option<Secret<String>>,
    base_url: String,
    client: Client,
}

impl GeminiProvider {
    pub fn new(
        api_key: Option<Secret<String>>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Build the API URL for the given model and method.
    fn api_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }
}

/// Split chat messages into Gemini's system instruction and user/model turns.
fn build_request(request: &ChatRequest) -> Result<GenerateContentRequest, ProviderError> {
    let mut system_parts = Vec::new();
    let mut contents = Vec::new();

    for message in &request.messages {
        let text = match &message.content {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => {
                let mut texts = Vec::with_capacity(parts.len());
                for part in parts {
                    match part {
                        ContentPart::Text(text) => texts.push(text.as_str()),
                        ContentPart::ImageUrl(_) => {
                            return Err(ProviderError::InvalidRequest(
                                "Gemini provider does not accept image URLs".to_string(),
                            ));
                        }
                    }
                }
                texts.join("\n")
            }
        };

        match message.role {
            Role::System => system_parts.push(Part { text }),
            Role::User => contents.push(Content {
                role: Some("user".to_string()),
                parts: vec![Part { text }],
            }),
        }
    }

    let params = &request.params;
    Ok(GenerateContentRequest {
        contents,
        system_instruction: (!system_parts.is_empty()).then(|| Content {
            role: None,
            parts: system_parts,
        }),
        generation_config: Some(GenerationConfig {
            temperature: params.temperature,
            max_output_tokens: params.max_tokens,
            response_mime_type: params.json_mode.then(|| "application/json".to_string()),
        }),
    })
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            ProviderError::NotConfigured("GOOGLE_API_KEY is not set".to_string())
        })?;

        let body = build_request(request)?;

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.api_url(&request.model, "generateContent"))
            .query(&[("key", api_key.expose_secret())])
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited(error_text));
            }

            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: format!("Gemini API error: {}", error_text),
            });
        }

        let api_response: GenerateContentResponse =
            response.json().await.map_err(|e| ProviderError::Api {
                status: 200,
                message: format!("Failed to parse response: {}", e),
            })?;

        api_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|content| content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or(ProviderError::EmptyResponse)
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::{ChatMessage, GenerationParams};
    use serde_json::json;

    #[test]
    fn test_system_messages_become_instruction() {
        let request = ChatRequest::new(
            "gemini-1.5-flash",
            vec![ChatMessage::system("be brief"), ChatMessage::user("hello")],
        )
        .with_params(GenerationParams {
            json_mode: true,
            ..Default::default()
        });

        let body = serde_json::to_value(build_request(&request).unwrap()).unwrap();

        assert_eq!(
            body,
            json!({
                "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }],
                "systemInstruction": { "parts": [{ "text": "be brief" }] },
                "generationConfig": { "responseMimeType": "application/json" }
            })
        );
    }

    #[test]
    fn test_image_parts_are_rejected() {
        let request = ChatRequest::new(
            "gemini-1.5-flash",
            vec![ChatMessage::user_with_image("what is it", "https://img/x.jpg")],
        );

        assert!(matches!(
            build_request(&request),
            Err(ProviderError::InvalidRequest(_))
        ));
    }
}

//! Manual troubleshooting checks for the external services.
//!
//! Each check repeats one call the service makes (or a cheaper cousin of
//! it) so a misconfigured key, model name or store URL can be spotted
//! without going through the HTTP API.

use crate::config::PantryConfig;
use crate::services::providers::gemini::{GeminiProvider, GEMINI_API_BASE};
use crate::services::providers::groq::GroqProvider;
use crate::services::providers::{
    ChatMessage, ChatProvider, ChatRequest, GenerationParams, ProviderError,
};
use crate::services::store::{RecordStore, RowQuery, StoreError, SupabaseStore, PANTRY_SCANS_TABLE};
use secrecy::{ExposeSecret, Secret};

/// Small, cheap text model for connectivity checks.
pub const DEFAULT_PING_MODEL: &str = "llama3-8b-8192";

pub const DEFAULT_VISION_PROBE_MODEL: &str = "llama-3.2-11b-vision-preview";

/// Public photo the vision model should always be able to fetch.
pub const KNOWN_GOOD_IMAGE: &str = "https://upload.wikimedia.org/wikipedia/commons/thumb/6/6d/Good_Food_Display_-_NCI_Visuals_Online.jpg/800px-Good_Food_Display_-_NCI_Visuals_Online.jpg";

pub const GROQ_PING_PROMPT: &str = "Reply with the word 'Success' if you can hear me.";
pub const GEMINI_PING_PROMPT: &str = "Say 'Hello' if you can hear me.";
pub const VISION_PROBE_PROMPT: &str = "What is in this image?";

/// Show only the first `visible` characters of a credential.
pub fn mask_secret(secret: &Secret<String>, visible: usize) -> String {
    let prefix: String = secret.expose_secret().chars().take(visible).collect();
    format!("{}...", prefix)
}

/// Troubleshooting hint for a failed model call, keyed on the HTTP status.
pub fn hint_for(err: &ProviderError) -> Option<&'static str> {
    match err.status()? {
        403 => Some("This is a permission error (check the API key)."),
        404 => Some("The model name might be wrong or deprecated."),
        400 => Some("Bad request. The image URL might be unreachable."),
        _ => None,
    }
}

pub struct Diagnostics {
    config: PantryConfig,
}

impl Diagnostics {
    pub fn new(config: PantryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PantryConfig {
        &self.config
    }

    /// Plain text round trip against Groq.
    pub async fn ping_groq(&self, model: &str) -> Result<String, ProviderError> {
        let provider = GroqProvider::new(&self.config.groq, self.config.http.timeout)?;
        let request = ChatRequest::new(model, vec![ChatMessage::user(GROQ_PING_PROMPT)]);
        provider.complete(&request).await
    }

    /// Ask a Groq vision model to describe `image_url`.
    pub async fn probe_vision(&self, model: &str, image_url: &str) -> Result<String, ProviderError> {
        let provider = GroqProvider::new(&self.config.groq, self.config.http.timeout)?;
        let request = ChatRequest::new(
            model,
            vec![ChatMessage::user_with_image(VISION_PROBE_PROMPT, image_url)],
        )
        .with_params(GenerationParams {
            temperature: Some(0.1),
            max_tokens: Some(1024),
            json_mode: false,
        });
        provider.complete(&request).await
    }

    /// Plain text round trip against Gemini.
    pub async fn ping_gemini(&self, base_url: Option<&str>) -> Result<String, ProviderError> {
        let provider = GeminiProvider::new(
            self.config.google.api_key.clone(),
            base_url.unwrap_or(GEMINI_API_BASE),
            self.config.http.timeout,
        )?;
        let request = ChatRequest::new(
            &self.config.google.model,
            vec![ChatMessage::user(GEMINI_PING_PROMPT)],
        );
        provider.complete(&request).await.map(|text| text.trim().to_string())
    }

    /// Read a single scan row to prove the store URL and key work.
    pub async fn probe_store(&self) -> Result<usize, StoreError> {
        let store = SupabaseStore::new(&self.config.supabase, self.config.http.timeout)?;
        let rows = store
            .query(PANTRY_SCANS_TABLE, &RowQuery::all().limit(1))
            .await?;
        Ok(rows.len())
    }
}

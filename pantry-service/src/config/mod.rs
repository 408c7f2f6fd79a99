use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

/// Default timeout for outbound calls to the model and store APIs.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 120;

pub const DEFAULT_GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_VISION_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";
pub const DEFAULT_TEXT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Clone)]
pub struct PantryConfig {
    pub common: core_config::Config,
    pub groq: GroqConfig,
    pub supabase: SupabaseConfig,
    pub google: GoogleConfig,
    pub http: HttpClientConfig,
}

/// Credentials are optional: a missing key surfaces when the model is called.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    pub api_key: Option<Secret<String>>,
    pub api_base_url: String,
    /// Model used for fridge photos.
    pub vision_model: String,
    /// Model used for recipe generation.
    pub text_model: String,
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub key: Option<Secret<String>>,
}

/// Only the diagnostics binary talks to Gemini.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub api_key: Option<Secret<String>>,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl PantryConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        Self::from_env(common_config)
    }

    /// Build the service configuration from process environment variables.
    pub fn from_env(common: core_config::Config) -> Result<Self, AppError> {
        let timeout_secs = match optional_env("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("HTTP_TIMEOUT_SECS is invalid: {}", e))
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(PantryConfig {
            common,
            groq: GroqConfig {
                api_key: optional_secret("GROQ_API_KEY"),
                api_base_url: env_or("GROQ_API_BASE", DEFAULT_GROQ_API_BASE),
                vision_model: env_or("GROQ_VISION_MODEL", DEFAULT_VISION_MODEL),
                text_model: env_or("GROQ_TEXT_MODEL", DEFAULT_TEXT_MODEL),
            },
            supabase: SupabaseConfig {
                url: optional_env("SUPABASE_URL"),
                key: optional_secret("SUPABASE_KEY"),
            },
            google: GoogleConfig {
                api_key: optional_secret("GOOGLE_API_KEY"),
                model: env_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            },
            http: HttpClientConfig {
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

/// Read an environment variable, treating empty values as unset.
pub fn optional_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn optional_secret(key: &str) -> Option<Secret<String>> {
    optional_env(key).map(Secret::new)
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

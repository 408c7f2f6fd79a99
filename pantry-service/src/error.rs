//! Failure kinds of the pantry request pipeline.

use crate::services::providers::ProviderError;
use service_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PantryError {
    /// The model API key is absent; only detected when a call is attempted.
    #[error("{0}")]
    CredentialMissing(String),

    #[error("Model call failed: {0}")]
    Model(ProviderError),

    /// The model ignored the JSON-only instruction or left out a key.
    #[error("Malformed model response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

impl From<ProviderError> for PantryError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured(msg) => PantryError::CredentialMissing(msg),
            other => PantryError::Model(other),
        }
    }
}

impl From<PantryError> for AppError {
    fn from(err: PantryError) -> Self {
        AppError::InternalError(anyhow::anyhow!(err.to_string()))
    }
}

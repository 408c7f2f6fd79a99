//! Mock provider implementation for testing.

use super::{ChatProvider, ChatRequest, ProviderError};
use async_trait::async_trait;
use std::sync::Mutex;

/// Mock chat provider that answers every request with the same scripted reply.
pub struct MockProvider {
    reply: Result<String, ProviderError>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockProvider {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            reply: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, ProviderError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        self.reply.clone()
    }
}

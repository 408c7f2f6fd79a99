#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pantry_service::config::{
    GoogleConfig, GroqConfig, HttpClientConfig, PantryConfig, SupabaseConfig,
};
use pantry_service::services::providers::mock::MockProvider;
use pantry_service::services::store::MemoryStore;
use pantry_service::startup::{router, AppState};
use secrecy::Secret;
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub const TEST_VISION_MODEL: &str = "test-vision-model";
pub const TEST_TEXT_MODEL: &str = "test-text-model";
pub const TEST_GROQ_KEY: &str = "gsk_test_key";
pub const TEST_SUPABASE_KEY: &str = "supabase-service-key";

/// Configuration pointing both external services at `groq_base` / `supabase_url`.
pub fn test_config(groq_base: &str, supabase_url: &str) -> PantryConfig {
    PantryConfig {
        common: CoreConfig { port: 0 },
        groq: GroqConfig {
            api_key: Some(Secret::new(TEST_GROQ_KEY.to_string())),
            api_base_url: groq_base.to_string(),
            vision_model: TEST_VISION_MODEL.to_string(),
            text_model: TEST_TEXT_MODEL.to_string(),
        },
        supabase: SupabaseConfig {
            url: Some(supabase_url.to_string()),
            key: Some(Secret::new(TEST_SUPABASE_KEY.to_string())),
        },
        google: GoogleConfig {
            api_key: Some(Secret::new("google-test-key".to_string())),
            model: "gemini-1.5-flash".to_string(),
        },
        http: HttpClientConfig {
            timeout: Duration::from_secs(5),
        },
    }
}

/// Router wired to a mock model and an in-memory store.
pub struct TestKitchen {
    pub model: Arc<MockProvider>,
    pub store: MemoryStore,
    pub router: Router,
}

impl TestKitchen {
    pub fn new(model: MockProvider, store: MemoryStore) -> Self {
        let model = Arc::new(model);
        let state = AppState {
            config: test_config("http://127.0.0.1:1", "http://127.0.0.1:1"),
            model: model.clone(),
            store: Arc::new(store.clone()),
        };

        Self {
            model,
            store,
            router: router(state),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(MockProvider::replying(text), MemoryStore::new())
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        send(&self.router, get_request(uri)).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        send(&self.router, post_request(uri, &body)).await
    }
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}

pub fn post_request(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

/// Drive one request through the router and decode the JSON body.
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).to_string(),
        ))
    };

    (status, body)
}

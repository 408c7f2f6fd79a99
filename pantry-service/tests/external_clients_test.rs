//! Wire-level tests for the Groq and Supabase clients using wiremock.

mod common;

use axum::http::StatusCode;
use common::{test_config, TEST_GROQ_KEY, TEST_SUPABASE_KEY, TEST_TEXT_MODEL};
use pantry_service::services::providers::groq::GroqProvider;
use pantry_service::services::providers::{ChatMessage, ChatProvider, ChatRequest, ProviderError};
use pantry_service::services::store::{
    RecordStore, RowQuery, StoreError, SupabaseStore, RECIPES_TABLE,
};
use pantry_service::startup::{router, AppState};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

fn groq(server: &MockServer) -> GroqProvider {
    let config = test_config(&server.uri(), "http://127.0.0.1:1");
    GroqProvider::new(&config.groq, Duration::from_secs(5)).unwrap()
}

fn supabase(url: &str) -> SupabaseStore {
    let config = test_config("http://127.0.0.1:1", url);
    SupabaseStore::new(&config.supabase, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn groq_returns_first_choice_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", format!("Bearer {}", TEST_GROQ_KEY).as_str()))
        .and(body_json(json!({
            "model": "llama3-8b-8192",
            "messages": [{ "role": "user", "content": "ping" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Success")))
        .expect(1)
        .mount(&server)
        .await;

    let reply = groq(&server)
        .complete(&ChatRequest::new(
            "llama3-8b-8192",
            vec![ChatMessage::user("ping")],
        ))
        .await
        .unwrap();

    assert_eq!(reply, "Success");
}

#[tokio::test]
async fn groq_error_envelope_becomes_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "message": "The model `nope` does not exist", "type": "invalid_request_error" }
        })))
        .mount(&server)
        .await;

    let err = groq(&server)
        .complete(&ChatRequest::new("nope", vec![ChatMessage::user("hi")]))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ProviderError::Api {
            status: 404,
            message: "The model `nope` does not exist".to_string()
        }
    );
}

#[tokio::test]
async fn groq_429_is_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let err = groq(&server)
        .complete(&ChatRequest::new("m", vec![ChatMessage::user("hi")]))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::RateLimited(_)));
    assert_eq!(err.status(), Some(429));
}

#[tokio::test]
async fn groq_without_choices_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = groq(&server)
        .complete(&ChatRequest::new("m", vec![ChatMessage::user("hi")]))
        .await
        .unwrap_err();

    assert_eq!(err, ProviderError::EmptyResponse);
}

#[tokio::test]
async fn supabase_insert_sends_credentials_twice_and_minimal_preference() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/pantry_scans"))
        .and(header("apikey", TEST_SUPABASE_KEY))
        .and(header(
            "authorization",
            format!("Bearer {}", TEST_SUPABASE_KEY).as_str(),
        ))
        .and(header("prefer", "return=minimal"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "image_url": "https://img/a.jpg", "ingredients": ["milk"] })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    supabase(&server.uri())
        .insert(
            "pantry_scans",
            &json!({ "image_url": "https://img/a.jpg", "ingredients": ["milk"] }),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn supabase_insert_rejection_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .mount(&server)
        .await;

    let err = supabase(&server.uri())
        .insert("recipes", &json!({ "title": "x" }))
        .await
        .unwrap_err();

    match err {
        StoreError::Status { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "Invalid API key");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn supabase_query_passes_select_order_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/recipes"))
        .and(query_param("select", "*"))
        .and(query_param("order", "created_at.desc"))
        .and(query_param("limit", "10"))
        .and(header("apikey", TEST_SUPABASE_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "title": "Newer", "created_at": "2024-05-02T00:00:00Z" },
            { "title": "Older", "created_at": "2024-05-01T00:00:00Z" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let rows = supabase(&server.uri())
        .query(
            RECIPES_TABLE,
            &RowQuery::all().order_desc("created_at").limit(10),
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["title"], "Newer");
}

/// App state backed by the real clients, pointed at `groq` and `store`.
fn live_state(groq: &MockServer, store_url: &str) -> AppState {
    let config = test_config(&groq.uri(), store_url);
    let model = GroqProvider::new(&config.groq, config.http.timeout).unwrap();
    let store = SupabaseStore::new(&config.supabase, config.http.timeout).unwrap();
    AppState {
        config,
        model: Arc::new(model),
        store: Arc::new(store),
    }
}

#[tokio::test]
async fn generate_recipe_end_to_end_renames_insert_payload() {
    let groq_server = MockServer::start().await;
    let store_server = MockServer::start().await;

    let reply = r#"{"title":"Egg Rice","time":"15 min","difficulty":"easy","ingredients":["egg","rice"],"instructions":["cook rice","fry egg","mix"]}"#;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_json(json!({
            "model": TEST_TEXT_MODEL,
            "messages": [
                { "role": "system", "content": "You are a helpful chef who outputs only JSON." },
                {
                    "role": "user",
                    "content": "Create a simple recipe using these ingredients: egg, rice. Return ONLY a valid JSON object with keys: 'title', 'time', 'difficulty', 'ingredients' (list), and 'instructions' (list)."
                }
            ],
            "response_format": { "type": "json_object" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(reply)))
        .expect(1)
        .mount(&groq_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/recipes"))
        .and(body_json(json!({
            "title": "Egg Rice",
            "cooking_time": "15 min",
            "difficulty": "easy",
            "ingredients_used": ["egg", "rice"],
            "instructions": ["cook rice", "fry egg", "mix"]
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&store_server)
        .await;

    let app = router(live_state(&groq_server, &store_server.uri()));
    let (status, body) = common::send(
        &app,
        common::post_request("/generate-recipe", &json!({ "ingredients": ["egg", "rice"] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::from_str::<serde_json::Value>(reply).unwrap());
}

#[tokio::test]
async fn model_failure_writes_nothing_to_store() {
    let groq_server = MockServer::start().await;
    let store_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Invalid API Key" }
        })))
        .mount(&groq_server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&store_server)
        .await;

    let app = router(live_state(&groq_server, &store_server.uri()));
    let (status, body) = common::send(
        &app,
        common::post_request("/analyze-fridge", &json!({ "image_url": "https://img/a.jpg" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("Invalid API Key"));
}

#[tokio::test]
async fn analyze_fridge_succeeds_when_store_rejects_insert() {
    let groq_server = MockServer::start().await;
    let store_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion(r#"{"ingredients":["milk"]}"#)),
        )
        .mount(&groq_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/pantry_scans"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&store_server)
        .await;

    let app = router(live_state(&groq_server, &store_server.uri()));
    let (status, body) = common::send(
        &app,
        common::post_request("/analyze-fridge", &json!({ "image_url": "https://img/a.jpg" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ingredients": ["milk"] }));
}

#[tokio::test]
async fn history_is_empty_when_store_unreachable() {
    let groq_server = MockServer::start().await;

    let app = router(live_state(&groq_server, "http://127.0.0.1:1"));
    let (status, body) = common::send(&app, common::get_request("/history")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn history_is_empty_when_store_errors() {
    let groq_server = MockServer::start().await;
    let store_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/recipes"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "relation \"recipes\" does not exist"
        })))
        .mount(&store_server)
        .await;

    let app = router(live_state(&groq_server, &store_server.uri()));
    let (status, body) = common::send(&app, common::get_request("/history")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

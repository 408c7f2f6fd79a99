use axum::{extract::State, Json};
use serde_json::Value;

use crate::error::PantryError;
use crate::handlers::persist;
use crate::models::{AnalyzeRequest, IngredientsReply, NewPantryScan};
use crate::services::providers::{ChatMessage, ChatRequest, GenerationParams};
use crate::services::store::PANTRY_SCANS_TABLE;
use crate::startup::AppState;
use service_core::error::AppError;

pub const FRIDGE_PROMPT: &str = "Look at this image. Identify the food ingredients visible. \
Return ONLY a valid JSON object with a single key 'ingredients' containing a list of strings. \
Do not add markdown formatting.";

const FRIDGE_TEMPERATURE: f32 = 0.1;
const FRIDGE_MAX_TOKENS: u32 = 1024;

/// Build the vision request for a fridge photo.
pub fn fridge_request(model: &str, image_url: &str) -> ChatRequest {
    ChatRequest::new(
        model,
        vec![ChatMessage::user_with_image(FRIDGE_PROMPT, image_url)],
    )
    .with_params(GenerationParams {
        temperature: Some(FRIDGE_TEMPERATURE),
        max_tokens: Some(FRIDGE_MAX_TOKENS),
        json_mode: true,
    })
}

#[tracing::instrument(skip(state, request), fields(image_url = %request.image_url))]
pub async fn analyze_fridge(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<Value>, AppError> {
    tracing::info!("Analyzing fridge image");

    let data = identify_ingredients(&state, &request.image_url)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, provider = state.model.name(), "Fridge analysis failed");
            e
        })?;

    Ok(Json(data))
}

async fn identify_ingredients(state: &AppState, image_url: &str) -> Result<Value, PantryError> {
    let request = fridge_request(&state.config.groq.vision_model, image_url);
    let content = state.model.complete(&request).await?;

    let data: Value = serde_json::from_str(&content)?;
    let reply: IngredientsReply = serde_json::from_value(data.clone())?;

    tracing::info!(
        count = reply.ingredients.as_array().map(Vec::len),
        "Identified ingredients"
    );

    let scan = NewPantryScan::new(image_url, reply.ingredients);
    persist(state.store.as_ref(), PANTRY_SCANS_TABLE, &scan).await;

    Ok(data)
}

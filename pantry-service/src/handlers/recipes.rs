use axum::{extract::State, Json};
use serde_json::Value;

use crate::error::PantryError;
use crate::handlers::persist;
use crate::models::{GeneratedRecipe, NewRecipe, RecipeRequest};
use crate::services::providers::{ChatMessage, ChatRequest, GenerationParams};
use crate::services::store::{RowQuery, RECIPES_TABLE};
use crate::startup::AppState;
use service_core::error::AppError;

pub const CHEF_SYSTEM_PROMPT: &str = "You are a helpful chef who outputs only JSON.";

/// Most recent recipes returned by `/history`.
pub const HISTORY_LIMIT: usize = 10;

pub fn recipe_prompt(ingredients: &[String]) -> String {
    format!(
        "Create a simple recipe using these ingredients: {}. Return ONLY a valid JSON object \
with keys: 'title', 'time', 'difficulty', 'ingredients' (list), and 'instructions' (list).",
        ingredients.join(", ")
    )
}

pub fn recipe_request(model: &str, ingredients: &[String]) -> ChatRequest {
    ChatRequest::new(
        model,
        vec![
            ChatMessage::system(CHEF_SYSTEM_PROMPT),
            ChatMessage::user(recipe_prompt(ingredients)),
        ],
    )
    .with_params(GenerationParams {
        json_mode: true,
        ..Default::default()
    })
}

#[tracing::instrument(skip(state, request), fields(ingredient_count = request.ingredients.len()))]
pub async fn generate_recipe(
    State(state): State<AppState>,
    Json(request): Json<RecipeRequest>,
) -> Result<Json<GeneratedRecipe>, AppError> {
    tracing::info!(ingredients = ?request.ingredients, "Generating recipe");

    let recipe = cook(&state, &request.ingredients).await.map_err(|e| {
        tracing::error!(error = %e, provider = state.model.name(), "Recipe generation failed");
        e
    })?;

    Ok(Json(recipe))
}

async fn cook(state: &AppState, ingredients: &[String]) -> Result<GeneratedRecipe, PantryError> {
    let request = recipe_request(&state.config.groq.text_model, ingredients);
    let content = state.model.complete(&request).await?;
    let recipe: GeneratedRecipe = serde_json::from_str(&content)?;

    tracing::info!(title = %recipe.title, "Generated recipe");

    persist(state.store.as_ref(), RECIPES_TABLE, &NewRecipe::from(&recipe)).await;

    Ok(recipe)
}

/// Latest recipes, newest first. Any store failure yields an empty list.
#[tracing::instrument(skip(state))]
pub async fn history(State(state): State<AppState>) -> Json<Vec<Value>> {
    let query = RowQuery::all().order_desc("created_at").limit(HISTORY_LIMIT);

    match state.store.query(RECIPES_TABLE, &query).await {
        Ok(mut rows) => {
            rows.truncate(HISTORY_LIMIT);
            Json(rows)
        }
        Err(e) => {
            tracing::error!(error = %e, "Error fetching history");
            Json(Vec::new())
        }
    }
}

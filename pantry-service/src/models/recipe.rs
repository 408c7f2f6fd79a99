//! Generated recipes and their persisted form.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /generate-recipe`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeRequest {
    pub ingredients: Vec<String>,
}

/// Recipe as produced by the model and returned to the caller.
///
/// Every key must be present; values are kept exactly as the model wrote them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedRecipe {
    pub title: Value,
    pub time: Value,
    pub difficulty: Value,
    pub ingredients: Value,
    pub instructions: Value,
}

/// Row written to the `recipes` table. `created_at` is assigned by the store.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewRecipe {
    pub title: Value,
    pub cooking_time: Value,
    pub difficulty: Value,
    pub ingredients_used: Value,
    pub instructions: Value,
}

impl From<&GeneratedRecipe> for NewRecipe {
    fn from(recipe: &GeneratedRecipe) -> Self {
        Self {
            title: recipe.title.clone(),
            cooking_time: recipe.time.clone(),
            difficulty: recipe.difficulty.clone(),
            ingredients_used: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
        }
    }
}

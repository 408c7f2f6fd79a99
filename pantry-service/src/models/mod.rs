//! Domain models for the pantry service.

pub mod recipe;
pub mod scan;

pub use recipe::{GeneratedRecipe, NewRecipe, RecipeRequest};
pub use scan::{AnalyzeRequest, IngredientsReply, NewPantryScan};

//! Fridge photo scans.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /analyze-fridge`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub image_url: String,
}

/// Shape the vision model is instructed to reply with. Only the key is
/// required; the value is stored as given.
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientsReply {
    pub ingredients: Value,
}

/// Row written to the `pantry_scans` table.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewPantryScan {
    pub image_url: String,
    pub ingredients: Value,
}

impl NewPantryScan {
    pub fn new(image_url: impl Into<String>, ingredients: Value) -> Self {
        Self {
            image_url: image_url.into(),
            ingredients,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reply_accepts_empty_ingredients() {
        let reply: IngredientsReply = serde_json::from_value(json!({ "ingredients": [] })).unwrap();
        assert_eq!(reply.ingredients, json!([]));
    }

    #[test]
    fn test_reply_keeps_non_string_items() {
        let reply: IngredientsReply =
            serde_json::from_value(json!({ "ingredients": [{ "name": "milk" }, 2] })).unwrap();
        assert_eq!(reply.ingredients, json!([{ "name": "milk" }, 2]));
    }

    #[test]
    fn test_reply_requires_ingredients_key() {
        let result = serde_json::from_value::<IngredientsReply>(json!({ "items": ["milk"] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_scan_row_shape() {
        let row = NewPantryScan::new("https://img/fridge.jpg", json!(["milk"]));
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!({ "image_url": "https://img/fridge.jpg", "ingredients": ["milk"] })
        );
    }
}

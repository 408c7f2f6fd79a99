//! HTTP handlers for pantry-service.

pub mod fridge;
pub mod health;
pub mod recipes;

pub use fridge::analyze_fridge;
pub use health::{health_check, home};
pub use recipes::{generate_recipe, history};

use crate::services::RecordStore;
use serde::Serialize;

/// Write a row, logging instead of propagating failures.
///
/// Callers never learn that a save failed, so a store outage loses rows
/// silently.
pub(crate) async fn persist<T: Serialize>(store: &dyn RecordStore, table: &str, row: &T) {
    let record = match serde_json::to_value(row) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(table = %table, error = %e, "Failed to serialize row, not saved");
            return;
        }
    };

    match store.insert(table, &record).await {
        Ok(()) => tracing::info!(table = %table, "Saved row to store"),
        Err(e) => tracing::warn!(table = %table, error = %e, "Failed to save row to store"),
    }
}

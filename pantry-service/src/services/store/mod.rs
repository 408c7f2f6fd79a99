//! Row store abstractions.
//!
//! The service only ever inserts rows and reads back filtered, sorted,
//! limited lists, which is exactly the surface of a PostgREST endpoint.

pub mod memory;
pub mod supabase;

pub use memory::MemoryStore;
pub use supabase::SupabaseStore;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Table holding one row per fridge photo analysis.
pub const PANTRY_SCANS_TABLE: &str = "pantry_scans";

/// Table holding one row per generated recipe.
pub const RECIPES_TABLE: &str = "recipes";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode store response: {0}")]
    Decode(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Column selection, ordering and row limit for a read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowQuery {
    pub select: String,
    /// Column to sort on, newest (largest) first.
    pub order_desc: Option<String>,
    pub limit: Option<usize>,
}

impl Default for RowQuery {
    fn default() -> Self {
        Self {
            select: "*".to_string(),
            order_desc: None,
            limit: None,
        }
    }
}

impl RowQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.order_desc = Some(column.to_string());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// PostgREST query parameters, e.g. `select=*&order=created_at.desc&limit=10`.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("select", self.select.clone())];
        if let Some(column) = &self.order_desc {
            params.push(("order", format!("{}.desc", column)));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// Trait for row stores (e.g., Supabase REST).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert one JSON object as a row. No row data is returned.
    async fn insert(&self, table: &str, record: &Value) -> Result<(), StoreError>;

    /// Read rows from `table` according to `query`.
    async fn query(&self, table: &str, query: &RowQuery) -> Result<Vec<Value>, StoreError>;
}

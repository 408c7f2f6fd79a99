//! In-process row store.
//!
//! Mirrors the PostgREST behaviour the service relies on: rows are JSON
//! objects, `created_at` is stamped on insert, reads honour order and limit.

use super::{RecordStore, RowQuery, StoreError};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that fails every call, standing in for an unreachable backend.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Snapshot of a table in insertion order.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .map(|tables| tables.get(table).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Network("memory store is unavailable".to_string()));
        }
        Ok(())
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, table: &str, record: &Value) -> Result<(), StoreError> {
        self.check_available()?;

        let Value::Object(fields) = record else {
            return Err(StoreError::InvalidRecord(
                "rows must be JSON objects".to_string(),
            ));
        };

        let mut row = fields.clone();
        row.entry("created_at").or_insert_with(|| {
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
        });

        let mut tables = self
            .tables
            .lock()
            .map_err(|_| StoreError::Network("memory store lock poisoned".to_string()))?;
        tables
            .entry(table.to_string())
            .or_default()
            .push(Value::Object(row));
        Ok(())
    }

    async fn query(&self, table: &str, query: &RowQuery) -> Result<Vec<Value>, StoreError> {
        self.check_available()?;

        let mut rows = self.rows(table);

        if let Some(column) = &query.order_desc {
            // Newest insert wins ties.
            rows.reverse();
            rows.sort_by(|a, b| compare_values(b.get(column), a.get(column)));
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        Ok(rows)
    }
}

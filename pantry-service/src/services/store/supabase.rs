//! Supabase REST (PostgREST) store client.

use super::{RecordStore, RowQuery, StoreError};
use crate::config::SupabaseConfig;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use std::time::Duration;

#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    base_url: Option<String>,
    key: Option<Secret<String>>,
}

impl SupabaseStore {
    pub fn new(config: &SupabaseConfig, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config
                .url
                .as_ref()
                .map(|url| url.trim_end_matches('/').to_string()),
            key: config.key.clone(),
        })
    }

    fn table_url(&self, table: &str) -> Result<String, StoreError> {
        let base = self
            .base_url
            .as_ref()
            .ok_or_else(|| StoreError::NotConfigured("SUPABASE_URL is not set".to_string()))?;
        Ok(format!("{}/rest/v1/{}", base, table))
    }

    /// The service key travels both as `apikey` and as a bearer token.
    fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, StoreError> {
        let key = self
            .key
            .as_ref()
            .ok_or_else(|| StoreError::NotConfigured("SUPABASE_KEY is not set".to_string()))?;
        Ok(request
            .header("apikey", key.expose_secret())
            .bearer_auth(key.expose_secret()))
    }
}

#[async_trait]
impl RecordStore for SupabaseStore {
    async fn insert(&self, table: &str, record: &Value) -> Result<(), StoreError> {
        let url = self.table_url(table)?;
        let request = self
            .authorize(self.client.post(&url))?
            .header("Prefer", "return=minimal")
            .json(record);

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(table = %table, status = %status, "Inserted row");
        Ok(())
    }

    async fn query(&self, table: &str, query: &RowQuery) -> Result<Vec<Value>, StoreError> {
        let url = self.table_url(table)?;
        let request = self
            .authorize(self.client.get(&url))?
            .query(&query.to_params());

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

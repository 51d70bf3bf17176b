//! PostgREST (Supabase) product store

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};

use crate::catalog::{
    config::StoreConfig,
    error::{single_line, Result, StoreError},
    query::{CandidateQuery, SearchQuery, RESULT_LIMIT},
    store::ProductStore,
    types::{Candidate, ProductRecord},
};

/// Product store reached through the PostgREST API Supabase exposes
pub struct RestProductStore {
    http_client: Client,
    config: StoreConfig,
}

impl RestProductStore {
    /// Create a store client; the endpoint is only checked on first use
    pub fn new(config: StoreConfig) -> Result<Self> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| StoreError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// `{endpoint}/rest/v1/{table}`
    fn table_url(&self) -> Result<String> {
        let endpoint = self.config.require_endpoint()?.trim_end_matches('/');
        Ok(format!("{}/rest/v1/{}", endpoint, self.config.table))
    }

    /// GET the table with `params` and decode the row list
    async fn fetch_rows(&self, params: &[(String, String)]) -> Result<Vec<Map<String, Value>>> {
        let url = self.table_url()?;

        let mut request = self
            .http_client
            .get(&url)
            .query(params)
            .header("Accept", "application/json");

        if let Some(key) = &self.config.access_key {
            request = request
                .header("apikey", key)
                .header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Remote {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let rows: Vec<Map<String, Value>> = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        tracing::debug!(rows = rows.len(), "store query returned");
        Ok(rows)
    }
}

#[async_trait]
impl ProductStore for RestProductStore {
    #[tracing::instrument(skip_all, fields(category = %query.category, max_price = query.max_price))]
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ProductRecord>> {
        let columns = &self.config.columns;
        let rows = self.fetch_rows(&query.postgrest_params(columns)).await?;

        let client_filter = query.needs_client_filter();
        Ok(rows
            .iter()
            .filter(|row| {
                !client_filter
                    || row
                        .get(&columns.label)
                        .and_then(Value::as_str)
                        .is_some_and(|label| query.matches_label(label))
            })
            .take(RESULT_LIMIT)
            .map(|row| ProductRecord::from_row(row, columns))
            .collect())
    }

    #[tracing::instrument(skip_all, fields(terms = query.terms.len(), budget = ?query.budget))]
    async fn candidates(&self, query: &CandidateQuery) -> Result<Vec<Candidate>> {
        let columns = &self.config.columns;
        let rows = self.fetch_rows(&query.postgrest_params(columns)).await?;

        Ok(rows
            .iter()
            .map(|row| Candidate::from_row(row, columns))
            .collect())
    }
}

/// PostgREST errors carry a JSON body with a `message` field
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("message").and_then(Value::as_str).map(single_line))
        .unwrap_or_else(|| single_line(body.lines().next().unwrap_or_default()))
}

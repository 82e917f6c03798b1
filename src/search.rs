use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::data_models::SearchResult;

pub const SERPSTACK_SEARCH_URL: &str = "http://api.serpstack.com/search";

#[derive(Debug, Error)]
pub enum SearchError {
    /// The provider answered, but with an error. `status` is set when the HTTP status itself
    /// was a failure, and unset when the error came inside a successful response.
    #[error("API Error: {detail}")]
    Upstream { status: Option<u16>, detail: String },

    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("undecodable search response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can answer a search query with organic results.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError>;
}

#[derive(Debug, Deserialize)]
struct SerpstackResponse {
    #[serde(default)]
    organic_results: Option<Vec<SearchResult>>,
    #[serde(default)]
    error: Option<Value>,
}

/// Pulls a readable message out of a provider error payload: `error.info` when present,
/// otherwise the `error` member itself.
fn describe_error(error: &Value) -> String {
    if let Some(info) = error.get("info").and_then(Value::as_str) {
        return info.to_string();
    }
    match error {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn error_detail_from_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("error").filter(|e| !e.is_null()).map(describe_error)
}

pub struct SerpstackClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    result_count: u32,
}

impl SerpstackClient {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: &str, result_count: u32) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            result_count,
        }
    }
}

#[async_trait]
impl SearchProvider for SerpstackClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        log::info!("searching: {query}");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("access_key", self.api_key.clone()),
                ("query", query.to_string()),
                ("num", self.result_count.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = error_detail_from_body(&body).unwrap_or_else(|| status.to_string());
            log::error!("search provider returned {status}: {detail}");
            return Err(SearchError::Upstream {
                status: Some(status.as_u16()),
                detail,
            });
        }

        let payload: SerpstackResponse = serde_json::from_str(&body)?;
        if let Some(error) = payload.error.as_ref().filter(|e| !e.is_null()) {
            let detail = describe_error(error);
            log::error!("search provider reported an error: {detail}");
            return Err(SearchError::Upstream {
                status: None,
                detail,
            });
        }

        let results = payload.organic_results.unwrap_or_default();
        log::info!("{} organic results for {query}", results.len());
        Ok(results)
    }
}

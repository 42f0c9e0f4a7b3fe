//! Brave Search backend

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::{SearchError, SearchHit, SearchProvider};

const PROVIDER: &str = "brave";
const ENDPOINT: &str = "https://api.search.brave.com/res/v1/web/search";

/// Search using the Brave Search API
pub struct BraveProvider {
    http: Client,
    api_key: Option<String>,
    api_key_env: String,
}

impl BraveProvider {
    pub fn new(http: Client, api_key: Option<String>, api_key_env: impl Into<String>) -> Self {
        Self {
            http,
            api_key,
            api_key_env: api_key_env.into(),
        }
    }
}

#[async_trait]
impl SearchProvider for BraveProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn text(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        debug!(%query, max_results, "BraveProvider::text: called");
        let api_key = self.api_key.as_deref().ok_or_else(|| SearchError::MissingApiKey {
            provider: PROVIDER,
            env: self.api_key_env.clone(),
        })?;

        let count = max_results.to_string();
        let response = self
            .http
            .get(ENDPOINT)
            .header("X-Subscription-Token", api_key)
            .header("Accept", "application/json")
            .query(&[("q", query), ("count", count.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                provider: PROVIDER,
                status,
                message,
            });
        }

        let result: Value = response.json().await?;
        Ok(parse_results(&result))
    }
}

/// Brave omits the `web` section entirely when nothing matched
fn parse_results(result: &Value) -> Vec<SearchHit> {
    result["web"]["results"]
        .as_array()
        .map(|results| {
            results
                .iter()
                .map(|r| SearchHit {
                    title: r["title"].as_str().map(str::to_string),
                    body: r["description"].as_str().map(str::to_string),
                    url: r["url"].as_str().map(str::to_string),
                })
                .collect()
        })
        .unwrap_or_default()
}

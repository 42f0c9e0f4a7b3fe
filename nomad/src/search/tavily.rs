//! Tavily backend

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::{SearchError, SearchHit, SearchProvider};

const PROVIDER: &str = "tavily";
const ENDPOINT: &str = "https://api.tavily.com/search";

/// Search using the Tavily API
pub struct TavilyProvider {
    http: Client,
    api_key: Option<String>,
    api_key_env: String,
}

impl TavilyProvider {
    pub fn new(http: Client, api_key: Option<String>, api_key_env: impl Into<String>) -> Self {
        Self {
            http,
            api_key,
            api_key_env: api_key_env.into(),
        }
    }
}

#[async_trait]
impl SearchProvider for TavilyProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn text(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        debug!(%query, max_results, "TavilyProvider::text: called");
        let api_key = self.api_key.as_deref().ok_or_else(|| SearchError::MissingApiKey {
            provider: PROVIDER,
            env: self.api_key_env.clone(),
        })?;

        let body = serde_json::json!({
            "api_key": api_key,
            "query": query,
            "max_results": max_results,
            "search_depth": "basic"
        });

        let response = self.http.post(ENDPOINT).json(&body).send().await?;

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
        parse_results(&result)
    }
}

fn parse_results(result: &Value) -> Result<Vec<SearchHit>, SearchError> {
    let results = result["results"].as_array().ok_or_else(|| SearchError::Parse {
        provider: PROVIDER,
        message: "missing results array".to_string(),
    })?;

    Ok(results
        .iter()
        .map(|r| SearchHit {
            title: r["title"].as_str().map(str::to_string),
            body: r["content"].as_str().map(str::to_string),
            url: r["url"].as_str().map(str::to_string),
        })
        .collect())
}

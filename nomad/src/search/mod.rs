//! Web search: backends plus the fallback-safe search stage
//!
//! [`search_web`] is what the pipeline calls. It never fails: errors and
//! empty result sets turn into fixed general-knowledge texts so the planner
//! prompt always has something in its research section.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

mod brave;
mod duckduckgo;
mod error;
mod tavily;

pub use brave::BraveProvider;
pub use duckduckgo::DuckDuckGoProvider;
pub use error::SearchError;
pub use tavily::TavilyProvider;

use crate::config::SearchConfig;
use crate::pipeline::{PipelineEvent, Reporter};

/// Returned when the backend answered but found nothing
pub const NO_RESULTS_TEXT: &str =
    "No specific search results found. Please provide general recommendations based on common knowledge.";

/// Returned when the backend failed
pub const UNAVAILABLE_TEXT: &str =
    "Search temporarily unavailable. Providing recommendations based on general travel knowledge.";

/// One search result, in provider relevance order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHit {
    pub title: Option<String>,
    pub body: Option<String>,
    pub url: Option<String>,
}

impl SearchHit {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: Some(body.into()),
            url: None,
        }
    }
}

/// A text-search backend
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short backend name for logs and events
    fn name(&self) -> &'static str;

    /// Run a query, returning at most `max_results` hits
    async fn text(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError>;
}

/// Build the configured backend
///
/// API keys are read from the environment here; a missing key is only an
/// error when a search is actually attempted.
pub fn create_provider(config: &SearchConfig) -> Result<Arc<dyn SearchProvider>, SearchError> {
    debug!(provider = %config.provider, "create_provider: called");
    let http = Client::builder()
        .timeout(Duration::from_millis(config.timeout_ms))
        .build()?;
    let api_key = || {
        std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    };

    match config.provider.as_str() {
        "duckduckgo" => Ok(Arc::new(DuckDuckGoProvider::new(http))),
        "tavily" => Ok(Arc::new(TavilyProvider::new(http, api_key(), &config.api_key_env))),
        "brave" => Ok(Arc::new(BraveProvider::new(http, api_key(), &config.api_key_env))),
        other => Err(SearchError::UnknownProvider(other.to_string())),
    }
}

/// Number the hits as `**Result n: title**` blocks separated by blank lines
pub fn format_results(hits: &[SearchHit]) -> String {
    hits.iter()
        .enumerate()
        .map(|(i, hit)| {
            format!(
                "**Result {}: {}**\n{}\n",
                i + 1,
                hit.title.as_deref().unwrap_or("No title"),
                hit.body.as_deref().unwrap_or("No description")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Search and format, substituting a fallback text on empty results or errors
pub async fn search_web(
    provider: &dyn SearchProvider,
    query: &str,
    max_results: usize,
    reporter: &dyn Reporter,
) -> String {
    debug!(provider = provider.name(), %query, max_results, "search_web: called");
    match provider.text(query, max_results).await {
        Ok(mut hits) if !hits.is_empty() => {
            hits.truncate(max_results);
            reporter.report(&PipelineEvent::SearchCompleted {
                provider: provider.name().to_string(),
                results: hits.len(),
            });
            format_results(&hits)
        }
        Ok(_) => {
            reporter.report(&PipelineEvent::SearchEmpty {
                provider: provider.name().to_string(),
            });
            NO_RESULTS_TEXT.to_string()
        }
        Err(e) => {
            reporter.report(&PipelineEvent::SearchFallback {
                provider: provider.name().to_string(),
                error: e.to_string(),
            });
            UNAVAILABLE_TEXT.to_string()
        }
    }
}

//! Search error types

use thiserror::Error;

/// Errors from a search backend
///
/// None of these abort a pipeline run; the search stage swaps them for a
/// fallback text.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{provider} API error {status}: {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("Failed to parse {provider} response: {message}")]
    Parse { provider: &'static str, message: String },

    #[error("No {provider} API key: set {env}")]
    MissingApiKey { provider: &'static str, env: String },

    #[error("Unknown search provider: {0}. Supported: duckduckgo, tavily, brave")]
    UnknownProvider(String),
}

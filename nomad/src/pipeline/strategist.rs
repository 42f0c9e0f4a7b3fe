//! Query strategist: asks the model for one web-search query

use tracing::{debug, warn};

use super::{PipelineEvent, StageDeps};
use crate::config::StageConfig;
use crate::domain::TripRequest;
use crate::llm::CompletionRequest;
use crate::prompts::PromptContext;

/// Produce a search query for the trip
///
/// Never fails: any problem with the completion call is reported and the
/// deterministic [`fallback_query`] is returned instead.
pub async fn build_search_query(deps: &StageDeps<'_>, stage: &StageConfig, request: &TripRequest) -> String {
    debug!(destination = %request.destination, "build_search_query: called");
    match generate(deps, stage, request).await {
        Ok(query) => {
            deps.reporter.report(&PipelineEvent::QueryGenerated { query: query.clone() });
            query
        }
        Err(error) => {
            let query = fallback_query(request);
            warn!(%error, %query, "build_search_query: falling back");
            deps.reporter.report(&PipelineEvent::QueryFallback {
                query: query.clone(),
                error,
            });
            query
        }
    }
}

async fn generate(deps: &StageDeps<'_>, stage: &StageConfig, request: &TripRequest) -> Result<String, String> {
    let system = deps.prompts.load_template("strategist-system").map_err(|e| e.to_string())?;
    let prompt = deps
        .prompts
        .render("strategist", &PromptContext::for_query(request))
        .map_err(|e| e.to_string())?;

    let completion = CompletionRequest::single_turn(system, prompt, stage.max_tokens)
        .with_model(&stage.model)
        .with_temperature(stage.temperature);

    let response = deps.client.complete(completion).await.map_err(|e| e.to_string())?;
    let query = clean_query(response.content.as_deref().unwrap_or_default());
    if query.trim().is_empty() {
        return Err("model returned an empty query".to_string());
    }
    Ok(query)
}

/// Trim whitespace, then drop at most one leading and one trailing `"`, then
/// the same for `'`
///
/// Ends are handled independently so a reply cut off by the token limit
/// (`"Lisbon events`) still loses its quote.
pub fn clean_query(raw: &str) -> String {
    let mut query = raw.trim();
    for quote in ['"', '\''] {
        query = query.strip_prefix(quote).unwrap_or(query);
        query = query.strip_suffix(quote).unwrap_or(query);
    }
    query.to_string()
}

/// Query used when the model cannot be asked
pub fn fallback_query(request: &TripRequest) -> String {
    format!("{} travel guide {} weather events", request.destination, request.month_year())
}

//! Itinerary planner: turns the trip and search results into Markdown

use tracing::{debug, error};

use super::{PipelineError, PipelineEvent, StageDeps};
use crate::config::StageConfig;
use crate::domain::{Itinerary, TripRequest};
use crate::llm::{CompletionRequest, LlmError, StopReason};
use crate::prompts::PromptContext;

/// Generate the full itinerary
///
/// The model's text is returned as-is. This is the one stage whose failure
/// aborts the run.
pub async fn build_itinerary(
    deps: &StageDeps<'_>,
    stage: &StageConfig,
    request: &TripRequest,
    search_text: &str,
) -> Result<Itinerary, PipelineError> {
    debug!(destination = %request.destination, search_len = search_text.len(), "build_itinerary: called");
    let result = generate(deps, stage, request, search_text).await;
    if let Err(ref e) = result {
        error!(error = %e, "build_itinerary: failed");
        deps.reporter.report(&PipelineEvent::PlannerFailed { error: e.to_string() });
    }
    result
}

async fn generate(
    deps: &StageDeps<'_>,
    stage: &StageConfig,
    request: &TripRequest,
    search_text: &str,
) -> Result<Itinerary, PipelineError> {
    let system = deps
        .prompts
        .load_template("planner-system")
        .map_err(|e| PipelineError::Prompt(e.to_string()))?;
    let prompt = deps
        .prompts
        .render("planner", &PromptContext::for_itinerary(request, search_text))
        .map_err(|e| PipelineError::Prompt(e.to_string()))?;

    let completion = CompletionRequest::single_turn(system, prompt, stage.max_tokens)
        .with_model(&stage.model)
        .with_temperature(stage.temperature);

    deps.reporter.report(&PipelineEvent::PlanningStarted);
    let response = deps.client.complete(completion).await.map_err(PipelineError::Planner)?;

    if response.stop_reason == StopReason::MaxTokens {
        debug!(max_tokens = stage.max_tokens, "build_itinerary: response hit the token limit");
    }

    match response.content {
        Some(text) if !text.trim().is_empty() => Ok(Itinerary::new(text)),
        _ => Err(PipelineError::Planner(LlmError::InvalidResponse(
            "completion contained no text".to_string(),
        ))),
    }
}

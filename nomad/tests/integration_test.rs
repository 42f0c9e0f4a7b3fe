//! Integration tests for the Nomad pipeline
//!
//! Runs the orchestrator end to end against in-process completion and search
//! doubles; nothing here touches the network.

use std::fs;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Datelike, Local, NaiveDate};
use tempfile::TempDir;

use nomad::config::StageConfig;
use nomad::domain::{BudgetLevel, Itinerary, SessionState, TravelGroup, TripRequest, ValidationError};
use nomad::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, StopReason, TokenUsage};
use nomad::pipeline::{Orchestrator, PipelineError, PipelineEvent, RecordingReporter};
use nomad::prompts::PromptLoader;
use nomad::search::{NO_RESULTS_TEXT, SearchError, SearchHit, SearchProvider};
use nomad::{download_filename, save_itinerary};

// =============================================================================
// Test doubles
// =============================================================================

/// Answers completion calls from a script, recording every request
struct ScriptedLlm {
    replies: Mutex<Vec<Result<String, u16>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedLlm {
    fn new(replies: Vec<Result<&str, u16>>) -> Arc<Self> {
        let mut replies: Vec<_> = replies.into_iter().map(|r| r.map(str::to_string)).collect();
        replies.reverse();
        Arc::new(Self {
            replies: Mutex::new(replies),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request);
        match self.replies.lock().unwrap().pop() {
            Some(Ok(text)) => Ok(CompletionResponse {
                content: Some(text),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
            }),
            Some(Err(status)) => Err(LlmError::ApiError {
                status,
                message: "scripted failure".to_string(),
            }),
            None => Err(LlmError::InvalidResponse("script exhausted".to_string())),
        }
    }

    fn default_model(&self) -> &str {
        "scripted"
    }
}

/// Search backend with canned hits
struct CannedSearch {
    hits: Vec<SearchHit>,
    queries: Mutex<Vec<String>>,
}

impl CannedSearch {
    fn new(hits: Vec<SearchHit>) -> Arc<Self> {
        Arc::new(Self {
            hits,
            queries: Mutex::new(Vec::new()),
        })
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for CannedSearch {
    fn name(&self) -> &'static str {
        "canned"
    }

    async fn text(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self.hits.iter().take(max_results).cloned().collect())
    }
}

fn first_of_next_month() -> NaiveDate {
    let today = Local::now().date_naive();
    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

fn lisbon() -> TripRequest {
    TripRequest::new(
        "Lisbon, Portugal",
        first_of_next_month(),
        5,
        BudgetLevel::MidRange,
        TravelGroup::Couple,
    )
}

const LISBON_MARKDOWN: &str = "# Trip to Lisbon, Portugal\n\n## 1. Trip Overview\n- **Weather**: mild\n";

// =============================================================================
// Pipeline Tests
// =============================================================================

#[tokio::test]
async fn test_end_to_end_lisbon() {
    let llm = ScriptedLlm::new(vec![Ok("Lisbon weather March festivals"), Ok(LISBON_MARKDOWN)]);
    let search = CannedSearch::new(vec![
        SearchHit::new("Lisbon in spring", "Warm days, cool nights."),
        SearchHit::new("Lisbon festivals", "Food and music events."),
    ]);
    let reporter = Arc::new(RecordingReporter::new());
    let orchestrator = Orchestrator::new(Some(llm.clone()), search.clone(), reporter.clone());
    let session = SessionState::new();

    let itinerary = orchestrator.run(&lisbon(), &session).await.expect("pipeline should succeed");

    assert_eq!(itinerary.as_str(), LISBON_MARKDOWN);
    assert_eq!(session.itinerary(), Some(Itinerary::new(LISBON_MARKDOWN)));
    assert_eq!(search.queries(), vec!["Lisbon weather March festivals".to_string()]);

    let requests = llm.requests();
    assert_eq!(requests.len(), 2);
    let strategist_prompt = &requests[0].messages[0].content;
    assert!(strategist_prompt.contains("Lisbon, Portugal"));
    assert!(strategist_prompt.contains(&lisbon().month_year()));

    let planner_prompt = &requests[1].messages[0].content;
    assert!(planner_prompt.contains("**Result 1: Lisbon in spring**\nWarm days, cool nights.\n"));
    assert!(planner_prompt.contains("**Result 2: Lisbon festivals**"));
    assert!(planner_prompt.contains("Mid-Range"));
    assert!(planner_prompt.contains("Couple"));
    assert_eq!(requests[1].max_tokens, 4000);

    assert!(reporter.problems().is_empty());
}

#[tokio::test]
async fn test_empty_search_still_plans() {
    let llm = ScriptedLlm::new(vec![Ok("\"Lisbon events 2025\""), Ok(LISBON_MARKDOWN)]);
    let search = CannedSearch::new(vec![]);
    let reporter = Arc::new(RecordingReporter::new());
    let orchestrator = Orchestrator::new(Some(llm.clone()), search.clone(), reporter.clone());

    orchestrator.run(&lisbon(), &SessionState::new()).await.unwrap();

    assert_eq!(search.queries(), vec!["Lisbon events 2025".to_string()]);
    assert!(llm.requests()[1].messages[0].content.contains(NO_RESULTS_TEXT));
    assert!(
        reporter
            .events()
            .iter()
            .any(|e| matches!(e, PipelineEvent::SearchEmpty { .. }))
    );
}

#[tokio::test]
async fn test_failed_rerun_keeps_previous_itinerary() {
    let llm = ScriptedLlm::new(vec![Ok("q1"), Ok(LISBON_MARKDOWN), Ok("q2"), Err(500)]);
    let search = CannedSearch::new(vec![SearchHit::new("t", "b")]);
    let orchestrator = Orchestrator::new(Some(llm), search, Arc::new(RecordingReporter::new()));
    let session = SessionState::new();

    orchestrator.run(&lisbon(), &session).await.unwrap();
    let err = orchestrator.run(&lisbon(), &session).await.unwrap_err();

    assert!(matches!(err, PipelineError::Planner(LlmError::ApiError { status: 500, .. })));
    assert_eq!(session.itinerary().unwrap().as_str(), LISBON_MARKDOWN);
}

#[tokio::test]
async fn test_validation_runs_before_any_call() {
    let llm = ScriptedLlm::new(vec![]);
    let search = CannedSearch::new(vec![]);
    let orchestrator = Orchestrator::new(Some(llm.clone()), search.clone(), Arc::new(RecordingReporter::new()));
    let mut request = lisbon();
    request.destination = "  ".to_string();

    let err = orchestrator.run(&request, &SessionState::new()).await.unwrap_err();

    assert!(matches!(err, PipelineError::Validation(ValidationError::EmptyDestination)));
    assert!(llm.requests().is_empty());
    assert!(search.queries().is_empty());
}

#[tokio::test]
async fn test_prompt_override_and_stage_settings() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(
        temp_dir.path().join("strategist.pmt"),
        "Query for {{destination}} lasting {{duration_days}} days",
    )
    .unwrap();

    let llm = ScriptedLlm::new(vec![Ok("q"), Ok("# Trip")]);
    let search = CannedSearch::new(vec![]);
    let strategist = StageConfig {
        model: "llama-3.3-70b-versatile".to_string(),
        temperature: 0.2,
        max_tokens: 50,
    };
    let orchestrator = Orchestrator::new(Some(llm.clone()), search, Arc::new(RecordingReporter::new()))
        .with_prompts(PromptLoader::new(temp_dir.path()))
        .with_stages(strategist, StageConfig::planner());

    orchestrator.run(&lisbon(), &SessionState::new()).await.unwrap();

    let first = &llm.requests()[0];
    assert_eq!(first.messages[0].content, "Query for Lisbon, Portugal lasting 5 days");
    assert_eq!(first.model.as_deref(), Some("llama-3.3-70b-versatile"));
    assert_eq!(first.temperature, Some(0.2));
    assert_eq!(first.max_tokens, 50);
}

// =============================================================================
// Output Tests
// =============================================================================

#[tokio::test]
async fn test_generated_itinerary_saves_under_sanitized_name() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let llm = ScriptedLlm::new(vec![Ok("q"), Ok("# Trip to New York")]);
    let orchestrator = Orchestrator::new(Some(llm), CannedSearch::new(vec![]), Arc::new(RecordingReporter::new()));
    let session = SessionState::new();
    let mut request = lisbon();
    request.destination = "New York".to_string();

    orchestrator.run(&request, &session).await.unwrap();
    let entry = session.current().unwrap();
    let path = save_itinerary(temp_dir.path(), &entry.destination, &entry.itinerary).unwrap();

    assert_eq!(download_filename("New York"), "itinerary_New_York.md");
    assert_eq!(path.file_name().unwrap(), "itinerary_New_York.md");
    assert_eq!(fs::read_to_string(path).unwrap(), "# Trip to New York");
}

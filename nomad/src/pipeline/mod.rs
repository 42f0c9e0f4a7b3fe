//! The two-stage prompt pipeline
//!
//! Strategist (query) → search → planner (itinerary). Stages run strictly in
//! order because each consumes the previous one's output.

mod error;
mod events;
mod orchestrator;
mod planner;
mod strategist;

pub use error::PipelineError;
pub use events::{ConsoleReporter, PipelineEvent, RecordingReporter, Reporter, Severity};
pub use orchestrator::Orchestrator;
pub use planner::build_itinerary;
pub use strategist::{build_search_query, clean_query, fallback_query};

use crate::llm::LlmClient;
use crate::prompts::PromptLoader;

/// Collaborators shared by the two completion stages
pub struct StageDeps<'a> {
    pub client: &'a dyn LlmClient,
    pub prompts: &'a PromptLoader,
    pub reporter: &'a dyn Reporter,
}

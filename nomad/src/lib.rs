//! Nomad - AI travel itinerary planner
//!
//! Turns a short trip form (destination, date, length, budget, group) into a
//! day-by-day Markdown itinerary with a two-stage prompt chain:
//!
//! 1. the **strategist** asks a small model for one web-search query,
//! 2. the query runs against a search backend,
//! 3. the **planner** writes the itinerary from the form plus the results.
//!
//! Search and query generation degrade to fallbacks; only the planner can
//! fail a run.
//!
//! # Modules
//!
//! - [`domain`] - Trip request, itinerary and session slot
//! - [`llm`] - Completion client trait and OpenAI-compatible implementation
//! - [`search`] - Search backends and the fallback-safe search stage
//! - [`prompts`] - Embedded Handlebars templates with file overrides
//! - [`pipeline`] - Strategist, planner and the orchestrator
//! - [`output`] - Saving itineraries as Markdown
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface
//! - [`repl`] - Interactive form

pub mod cli;
pub mod config;
pub mod domain;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod repl;
pub mod search;

// Re-export commonly used types
pub use config::{Config, LlmConfig, SearchConfig, StageConfig};
pub use domain::{BudgetLevel, Itinerary, SessionEntry, SessionState, TravelGroup, TripRequest, ValidationError};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAIClient, create_client};
pub use output::{download_filename, save_itinerary};
pub use pipeline::{Orchestrator, PipelineError, PipelineEvent, Reporter};
pub use prompts::PromptLoader;
pub use search::{SearchError, SearchHit, SearchProvider, create_provider, search_web};

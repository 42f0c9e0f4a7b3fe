//! Pipeline orchestrator: strategist, then search, then planner

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use eyre::{Context, Result};
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use super::{PipelineError, PipelineEvent, Reporter, StageDeps, build_itinerary, build_search_query};
use crate::config::{Config, StageConfig};
use crate::domain::{Itinerary, SessionState, TripRequest, ValidationError};
use crate::llm::{LlmClient, create_client};
use crate::prompts::PromptLoader;
use crate::search::{SearchProvider, create_provider, search_web};

/// Runs one trip request through the two-stage prompt chain
///
/// Holds only collaborators and settings; nothing from one run is kept for
/// the next except what is written to the [`SessionState`] passed in.
pub struct Orchestrator {
    /// `None` when no usable credential was supplied
    llm: Option<Arc<dyn LlmClient>>,
    search: Arc<dyn SearchProvider>,
    prompts: PromptLoader,
    reporter: Arc<dyn Reporter>,
    strategist: StageConfig,
    planner: StageConfig,
    max_results: usize,
    api_key_env: String,
}

impl Orchestrator {
    pub fn new(llm: Option<Arc<dyn LlmClient>>, search: Arc<dyn SearchProvider>, reporter: Arc<dyn Reporter>) -> Self {
        let defaults = Config::default();
        Self {
            llm,
            search,
            prompts: PromptLoader::embedded_only(),
            reporter,
            strategist: defaults.strategist,
            planner: defaults.planner,
            max_results: defaults.search.max_results,
            api_key_env: defaults.llm.api_key_env,
        }
    }

    /// Wire up the configured completion client and search backend
    ///
    /// A missing `api_key` is not an error here; runs will fail validation
    /// until one is supplied.
    pub fn from_config(config: &Config, api_key: Option<&str>, reporter: Arc<dyn Reporter>) -> Result<Self> {
        debug!(has_key = api_key.is_some(), "Orchestrator::from_config: called");
        let llm = api_key
            .map(|key| create_client(&config.llm, key))
            .transpose()
            .context("Failed to create completion client")?;
        let search = create_provider(&config.search).context("Failed to create search provider")?;

        Ok(Self {
            llm,
            search,
            prompts: PromptLoader::new(&config.prompts.dir),
            reporter,
            strategist: config.strategist.clone(),
            planner: config.planner.clone(),
            max_results: config.search.max_results,
            api_key_env: config.llm.api_key_env.clone(),
        })
    }

    pub fn with_prompts(mut self, prompts: PromptLoader) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_stages(mut self, strategist: StageConfig, planner: StageConfig) -> Self {
        self.strategist = strategist;
        self.planner = planner;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Swap the completion client, e.g. after the user enters a new key
    pub fn set_client(&mut self, llm: Option<Arc<dyn LlmClient>>) {
        self.llm = llm;
    }

    pub fn has_client(&self) -> bool {
        self.llm.is_some()
    }

    /// Run the pipeline, validating against today's local date
    pub async fn run(&self, request: &TripRequest, session: &SessionState) -> Result<Itinerary, PipelineError> {
        self.run_on(request, session, Local::now().date_naive()).await
    }

    /// Run the pipeline, validating the travel date against `today`
    ///
    /// On success the itinerary replaces the session's; on any failure the
    /// session is left untouched.
    pub async fn run_on(
        &self,
        request: &TripRequest,
        session: &SessionState,
        today: NaiveDate,
    ) -> Result<Itinerary, PipelineError> {
        debug!(destination = %request.destination, %today, "run_on: called");
        request.validate(today)?;
        let client = self
            .llm
            .as_deref()
            .ok_or_else(|| ValidationError::MissingCredential(self.api_key_env.clone()))?;

        let run_id = Uuid::now_v7().to_string();
        let span = info_span!("pipeline", %run_id, destination = %request.destination);

        async {
            self.reporter.report(&PipelineEvent::RunStarted {
                run_id: run_id.clone(),
                destination: request.destination.clone(),
            });
            let deps = StageDeps {
                client,
                prompts: &self.prompts,
                reporter: self.reporter.as_ref(),
            };

            let query = build_search_query(&deps, &self.strategist, request).await;
            let search_text = search_web(self.search.as_ref(), &query, self.max_results, self.reporter.as_ref()).await;
            let itinerary = build_itinerary(&deps, &self.planner, request, &search_text).await?;

            session.replace(request.destination.clone(), itinerary.clone());
            info!(chars = itinerary.len(), "run_on: itinerary stored in session");
            self.reporter.report(&PipelineEvent::ItineraryReady {
                chars: itinerary.len(),
            });
            Ok::<_, PipelineError>(itinerary)
        }
        .instrument(span)
        .await
    }
}

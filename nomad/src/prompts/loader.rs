//! Prompt Loader
//!
//! Loads prompt templates from an override directory or falls back to
//! embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;
use crate::domain::TripRequest;

/// Variables available to prompt templates
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    pub destination: String,
    /// "March 2026"
    pub month_year: String,
    /// "March 01, 2026"
    pub full_date: String,
    pub duration_days: u32,
    pub budget: String,
    pub group: String,
    /// Formatted search results (planner only)
    pub search_data: Option<String>,
}

impl PromptContext {
    /// Context for the query strategist
    pub fn for_query(request: &TripRequest) -> Self {
        Self {
            destination: request.destination.clone(),
            month_year: request.month_year(),
            full_date: request.full_date(),
            duration_days: request.duration_days,
            budget: request.budget.label().to_string(),
            group: request.group.label().to_string(),
            search_data: None,
        }
    }

    /// Context for the itinerary planner
    pub fn for_itinerary(request: &TripRequest, search_data: &str) -> Self {
        Self {
            search_data: Some(search_data.to_string()),
            ..Self::for_query(request)
        }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// Override directory (e.g., `.nomad/prompts/`)
    override_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that checks `dir` for `{name}.pmt` overrides
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        debug!(?dir, exists = dir.exists(), "PromptLoader::new: called");
        Self {
            hbs: Self::engine(),
            override_dir: if dir.exists() { Some(dir.to_path_buf()) } else { None },
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        Self {
            hbs: Self::engine(),
            override_dir: None,
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        // Prompts are plain text, not HTML
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. Override: `{override_dir}/{name}.pmt`
    /// 2. Embedded fallback
    pub fn load_template(&self, name: &str) -> Result<String> {
        if let Some(ref dir) = self.override_dir {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!("Loading prompt from override: {:?}", path);
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt override {}: {}", path.display(), e));
            }
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!("Using embedded prompt: {}", name);
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &PromptContext) -> Result<String> {
        let template = self.load_template(template_name)?;
        info!(
            "Rendering template '{}' for {} ({} days)",
            template_name, context.destination, context.duration_days
        );

        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }
}

impl Default for PromptLoader {
    fn default() -> Self {
        Self::embedded_only()
    }
}

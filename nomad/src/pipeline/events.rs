//! Pipeline progress and warning events
//!
//! Stages report what happened through a [`Reporter`]. The terminal front-end
//! prints these; tests record them.

use std::sync::{Mutex, PoisonError};

use colored::Colorize;
use tracing::{error, info, warn};

/// How loudly an event should be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Something a pipeline stage wants the operator to know
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// A run passed validation and is starting
    RunStarted { run_id: String, destination: String },
    /// The strategist produced a search query
    QueryGenerated { query: String },
    /// The strategist call failed; a template query is used instead
    QueryFallback { query: String, error: String },
    /// The search backend returned results
    SearchCompleted { provider: String, results: usize },
    /// The search backend returned nothing
    SearchEmpty { provider: String },
    /// The search backend failed; general-knowledge text is used instead
    SearchFallback { provider: String, error: String },
    /// The planner call is about to be made
    PlanningStarted,
    /// The planner call failed; the run aborts
    PlannerFailed { error: String },
    /// The run finished and the session was updated
    ItineraryReady { chars: usize },
}

impl PipelineEvent {
    pub fn severity(&self) -> Severity {
        match self {
            Self::QueryFallback { .. } | Self::SearchEmpty { .. } | Self::SearchFallback { .. } => Severity::Warning,
            Self::PlannerFailed { .. } => Severity::Error,
            _ => Severity::Info,
        }
    }

    /// One-line human description
    pub fn message(&self) -> String {
        match self {
            Self::RunStarted { destination, .. } => format!("Planning a trip to {}", destination),
            Self::QueryGenerated { query } => format!("Search query generated: {}", query),
            Self::QueryFallback { query, error } => {
                format!("Error generating search query: {} (using \"{}\")", error, query)
            }
            Self::SearchCompleted { provider, results } => {
                format!("Retrieved {} result(s) from {}", results, provider)
            }
            Self::SearchEmpty { provider } => format!("No results from {}; using general knowledge", provider),
            Self::SearchFallback { error, .. } => format!("Search encountered an issue: {}", error),
            Self::PlanningStarted => "Generating your personalized itinerary...".to_string(),
            Self::PlannerFailed { error } => format!("Error generating itinerary: {}", error),
            Self::ItineraryReady { chars } => format!("Your itinerary is ready ({} chars)", chars),
        }
    }
}

/// The operator/UI channel stages report into
pub trait Reporter: Send + Sync {
    fn report(&self, event: &PipelineEvent);
}

fn log_event(event: &PipelineEvent) {
    match event.severity() {
        Severity::Info => info!(?event, "{}", event.message()),
        Severity::Warning => warn!(?event, "{}", event.message()),
        Severity::Error => error!(?event, "{}", event.message()),
    }
}

/// Prints coloured status lines to stderr and logs every event
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter {
    /// Suppress informational lines; warnings and errors still print
    pub quiet: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: &PipelineEvent) {
        log_event(event);
        let line = match event.severity() {
            Severity::Info if self.quiet => return,
            Severity::Info => format!("{} {}", "\u{2022}".bright_blue(), event.message()),
            Severity::Warning => format!("{} {}", "warning:".yellow().bold(), event.message()),
            Severity::Error => format!("{} {}", "error:".red().bold(), event.message()),
        };
        eprintln!("{}", line);
    }
}

/// Keeps every event in memory, in order
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Events at warning level or above
    pub fn problems(&self) -> Vec<PipelineEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.severity() != Severity::Info)
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: &PipelineEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity() {
        assert_eq!(PipelineEvent::PlanningStarted.severity(), Severity::Info);
        assert_eq!(
            PipelineEvent::SearchFallback {
                provider: "duckduckgo".to_string(),
                error: "timeout".to_string()
            }
            .severity(),
            Severity::Warning
        );
        assert_eq!(
            PipelineEvent::PlannerFailed {
                error: "API error 500".to_string()
            }
            .severity(),
            Severity::Error
        );
    }

    #[test]
    fn test_messages() {
        let event = PipelineEvent::QueryFallback {
            query: "Lisbon travel guide March 2026 weather events".to_string(),
            error: "API error 401: bad key".to_string(),
        };
        assert!(event.message().starts_with("Error generating search query: API error 401"));

        let event = PipelineEvent::SearchFallback {
            provider: "brave".to_string(),
            error: "quota".to_string(),
        };
        assert_eq!(event.message(), "Search encountered an issue: quota");
    }

    #[test]
    fn test_console_reporter_prints_every_severity() {
        for quiet in [false, true] {
            let reporter = ConsoleReporter::new(quiet);
            reporter.report(&PipelineEvent::PlanningStarted);
            reporter.report(&PipelineEvent::SearchEmpty {
                provider: "duckduckgo".to_string(),
            });
            reporter.report(&PipelineEvent::PlannerFailed {
                error: "API error 500".to_string(),
            });
        }
    }

    #[test]
    fn test_recording_reporter_keeps_order() {
        let reporter = RecordingReporter::new();
        reporter.report(&PipelineEvent::PlanningStarted);
        reporter.report(&PipelineEvent::PlannerFailed {
            error: "boom".to_string(),
        });

        let events = reporter.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], PipelineEvent::PlanningStarted);
        assert_eq!(reporter.problems().len(), 1);
    }
}

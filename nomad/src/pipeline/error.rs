//! Pipeline error types

use thiserror::Error;

use crate::domain::ValidationError;
use crate::llm::LlmError;

/// Why a pipeline run did not produce an itinerary
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The request was refused before any external call
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// The itinerary completion call failed
    #[error("Itinerary generation failed: {0}")]
    Planner(#[source] LlmError),

    /// The planner prompt could not be rendered
    #[error("Itinerary prompt could not be built: {0}")]
    Prompt(String),
}

impl PipelineError {
    pub fn is_validation(&self) -> bool {
        matches!(self, PipelineError::Validation(_))
    }

    /// The run failed for want of a working API key
    pub fn needs_api_key(&self) -> bool {
        match self {
            PipelineError::Validation(ValidationError::MissingCredential(_)) => true,
            PipelineError::Planner(e) => e.is_auth_error(),
            _ => false,
        }
    }

    /// Advice to show next to the error, when the cause is actionable
    pub fn hint(&self) -> Option<String> {
        if let PipelineError::Planner(e) = self {
            if e.is_auth_error() {
                return Some("The completion service rejected the API key; check it and try again".to_string());
            }
            if let Some(wait) = e.retry_after() {
                return Some(format!(
                    "The completion service is rate limiting requests; try again in {}s",
                    wait.as_secs()
                ));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_from() {
        let err: PipelineError = ValidationError::EmptyDestination.into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Invalid request: Please enter a destination");
    }

    #[test]
    fn test_planner_keeps_source() {
        let err = PipelineError::Planner(LlmError::ApiError {
            status: 500,
            message: "upstream".to_string(),
        });
        assert!(!err.is_validation());
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "API error 500: upstream");
        assert!(!err.needs_api_key());
        assert_eq!(err.hint(), None);
    }

    #[test]
    fn test_rejected_key_needs_new_key() {
        let err = PipelineError::Planner(LlmError::ApiError {
            status: 401,
            message: "Invalid API Key".to_string(),
        });
        assert!(err.needs_api_key());
        assert!(err.hint().unwrap().contains("check it"));

        let err: PipelineError = ValidationError::MissingCredential("GROQ_API_KEY".to_string()).into();
        assert!(err.needs_api_key());
        assert_eq!(err.hint(), None);
    }

    #[test]
    fn test_rate_limit_hint_names_wait() {
        let err = PipelineError::Planner(LlmError::RateLimited {
            retry_after: std::time::Duration::from_secs(42),
        });
        assert!(!err.needs_api_key());
        assert_eq!(
            err.hint().as_deref(),
            Some("The completion service is rate limiting requests; try again in 42s")
        );
    }
}

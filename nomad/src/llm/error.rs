//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Missing API key: set {0} or pass one explicitly")]
    MissingApiKey(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown LLM provider: '{0}'. Supported: groq, openai")]
    UnknownProvider(String),
}

impl LlmError {
    /// Check if the provider rejected the credential
    pub fn is_auth_error(&self) -> bool {
        matches!(self, LlmError::ApiError { status: 401 | 403, .. } | LlmError::MissingApiKey(_))
    }

    /// How long the provider asked us to wait, for rate limit errors
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            LlmError::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_auth_error() {
        assert!(
            LlmError::ApiError {
                status: 401,
                message: "Invalid API Key".to_string()
            }
            .is_auth_error()
        );
        assert!(LlmError::MissingApiKey("GROQ_API_KEY".to_string()).is_auth_error());
        assert!(
            !LlmError::ApiError {
                status: 500,
                message: "Server error".to_string()
            }
            .is_auth_error()
        );
        assert!(!LlmError::InvalidResponse("Bad JSON".to_string()).is_auth_error());
    }

    #[test]
    fn test_retry_after() {
        let err = LlmError::RateLimited {
            retry_after: Duration::from_secs(42),
        };
        assert_eq!(err.retry_after(), Some(Duration::from_secs(42)));

        let err = LlmError::ApiError {
            status: 500,
            message: "Server error".to_string(),
        };
        assert_eq!(err.retry_after(), None);
    }

    #[test]
    fn test_display_keeps_detail() {
        let err = LlmError::ApiError {
            status: 400,
            message: "model_not_found".to_string(),
        };
        assert_eq!(err.to_string(), "API error 400: model_not_found");
    }
}

//! Error types for the API client

use streamlyne_core::validation::ValidationResult;
use streamlyne_engine::SubmissionError;
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing environment variable
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// Input rejected before any request was made
    #[error("Validation failed: {0}")]
    Validation(ValidationResult),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// Circuit breaker is open
    #[error("Circuit breaker is open - service temporarily unavailable")]
    CircuitOpen,

    /// All retry attempts exhausted
    #[error("All {attempts} retry attempts failed: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Last error message
        last_error: String,
    },
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a missing env var error
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnvVar(var.into())
    }

    /// Create an API response error from the raw response body
    pub fn api_response(status: u16, body: &str) -> Self {
        Self::ApiResponse {
            status,
            message: backend_message(body),
        }
    }

    /// Check if this error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect() || e.is_timeout(),
            Self::ApiResponse { status, .. } => *status >= 500 || *status == 429,
            Self::CircuitOpen
            | Self::Config(_)
            | Self::MissingEnvVar(_)
            | Self::Validation(_)
            | Self::Json(_)
            | Self::RetriesExhausted { .. } => false,
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if (400..500).contains(status))
    }

    /// Message suitable for showing to the user as is
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ApiResponse { message, .. } => message.clone(),
            Self::Validation(result) => result.summary(),
            other => other.to_string(),
        }
    }
}

impl From<ApiError> for SubmissionError {
    fn from(err: ApiError) -> Self {
        SubmissionError::new(err.user_message())
    }
}

/// Pull the human-readable message out of a PostgREST or GoTrue error body.
fn backend_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|value| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|key| value.get(key).and_then(serde_json::Value::as_str))
        })
        .map_or_else(|| body.trim().to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgrest_message_is_extracted() {
        let body = concat!(
            r#"{"code":"42501","details":null,"hint":null,"#,
            r#""message":"new row violates row-level security policy for table \"reviews\""}"#
        );
        let err = ApiError::api_response(403, body);
        assert_eq!(
            err.user_message(),
            "new row violates row-level security policy for table \"reviews\""
        );
        assert!(err.is_client_error());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_gotrue_message_is_extracted() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        let err = ApiError::api_response(400, body);
        assert_eq!(err.user_message(), "Invalid login credentials");
    }

    #[test]
    fn test_plain_body_is_kept() {
        let err = ApiError::api_response(502, " Bad Gateway \n");
        assert_eq!(err.user_message(), "Bad Gateway");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_converts_to_submission_error() {
        let err = ApiError::api_response(409, r#"{"message":"duplicate key value"}"#);
        let submission: SubmissionError = err.into();
        assert_eq!(submission.message, "duplicate key value");
    }
}

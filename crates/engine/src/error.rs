//! Error types for the engine crate.

use std::fmt;
use std::path::PathBuf;
use streamlyne_core::validation::ValidationResult;
use streamlyne_geo::GeoError;
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Why no reference point is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unavailable {
    /// No location fix has arrived yet
    Pending,
    /// The user refused location access
    PermissionDenied,
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unavailable::Pending => f.write_str("no location fix yet"),
            Unavailable::PermissionDenied => f.write_str("location permission denied"),
        }
    }
}

/// The backend rejected or never received an annotation.
///
/// The message is the backend's own, shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubmissionError {
    /// Message reported by the backend
    pub message: String,
}

impl SubmissionError {
    /// Wrap a backend message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors that can occur in the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A proximity query or viewport focus ran without a reference point
    #[error("Current location not available: {0}")]
    LocationUnavailable(Unavailable),

    /// Local precondition failed; nothing was sent to the backend
    #[error("Validation failed: {0}")]
    Validation(ValidationResult),

    /// Backend rejected the submission
    #[error("Submission failed: {0}")]
    Submission(#[from] SubmissionError),

    /// The selection controller does not accept this event in its current state
    #[error("Cannot {event} while {state}")]
    InvalidTransition {
        /// State the controller was in
        state: &'static str,
        /// Rejected event
        event: &'static str,
    },

    /// Layer name is not one of the known layer keys
    #[error("Unknown layer '{0}'")]
    UnknownLayer(String),

    /// Backing source could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    SourceUnreadable {
        /// Path of the source
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Source contents or a coordinate were rejected
    #[error(transparent)]
    Geo(#[from] GeoError),
}

/// Error code for integration with streamlyne-core error handling.
/// Range: 11xxx for engine errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineErrorCode {
    /// No reference point
    LocationUnavailable = 11001,
    /// Local validation failure
    Validation = 11002,
    /// Backend submission failure
    Submission = 11003,
    /// Event not accepted in the current state
    InvalidTransition = 11004,
    /// Unknown layer key
    UnknownLayer = 11005,
    /// Unreadable source file
    SourceUnreadable = 11006,
    /// Malformed source or invalid coordinate
    Geo = 11007,
}

impl EngineError {
    /// Returns the error code for this error.
    pub fn code(&self) -> EngineErrorCode {
        match self {
            EngineError::LocationUnavailable(_) => EngineErrorCode::LocationUnavailable,
            EngineError::Validation(_) => EngineErrorCode::Validation,
            EngineError::Submission(_) => EngineErrorCode::Submission,
            EngineError::InvalidTransition { .. } => EngineErrorCode::InvalidTransition,
            EngineError::UnknownLayer(_) => EngineErrorCode::UnknownLayer,
            EngineError::SourceUnreadable { .. } => EngineErrorCode::SourceUnreadable,
            EngineError::Geo(_) => EngineErrorCode::Geo,
        }
    }

    /// True for failures caused by user input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            EngineError::Validation(_)
                | EngineError::InvalidTransition { .. }
                | EngineError::UnknownLayer(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamlyne_core::validation::Validator;

    #[test]
    fn test_submission_message_is_verbatim() {
        let err: EngineError = SubmissionError::new("duplicate key value").into();
        assert_eq!(err.code(), EngineErrorCode::Submission);
        assert_eq!(err.to_string(), "Submission failed: duplicate key value");
    }

    #[test]
    fn test_location_unavailable_display() {
        let err = EngineError::LocationUnavailable(Unavailable::PermissionDenied);
        assert_eq!(err.code() as u32, 11001);
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn test_validation_lists_fields() {
        let result = Validator::new().required("review", "").validate();
        let err = EngineError::Validation(result);
        assert!(err.is_user_error());
        assert!(err.to_string().contains("review"));
    }
}

//! Annotations attached to a coordinate and the port they are submitted through.

use crate::error::SubmissionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use streamlyne_geo::Coordinate;

/// Row inserted into the `reviews` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Review text
    pub review: String,
    /// Latitude of the reviewed feature, unrounded
    pub latitude: f64,
    /// Longitude of the reviewed feature, unrounded
    pub longitude: f64,
    /// Author id
    pub user_id: String,
    /// Author email
    pub user_email: String,
}

impl ReviewRecord {
    /// Review of the feature at `coordinate` by the signed-in user.
    pub fn new(review: impl Into<String>, coordinate: Coordinate, session: &AuthSession) -> Self {
        Self {
            review: review.into(),
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            user_id: session.user_id.clone(),
            user_email: session.email.clone(),
        }
    }
}

/// Row inserted into the `outbreaks` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutbreakRecord {
    /// Disease name
    pub disease: String,
    /// Free-text description
    pub description: String,
    /// Latitude of the reported feature, unrounded
    pub latitude: f64,
    /// Longitude of the reported feature, unrounded
    pub longitude: f64,
}

/// A signed-in user.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Bearer token for backend requests
    pub access_token: String,
    /// User id
    pub user_id: String,
    /// User email
    pub email: String,
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("access_token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .finish()
    }
}

/// Backend that persists annotations.
pub trait AnnotationSink: Send + Sync {
    /// Store a review written by `session`'s user.
    fn submit_review(
        &self,
        session: &AuthSession,
        record: &ReviewRecord,
    ) -> impl Future<Output = Result<(), SubmissionError>> + Send;

    /// Store an outbreak report.
    fn report_outbreak(
        &self,
        record: &OutbreakRecord,
    ) -> impl Future<Output = Result<(), SubmissionError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_record_copies_exact_coordinate() {
        let session = AuthSession {
            access_token: "token".to_string(),
            user_id: "u-1".to_string(),
            email: "field@example.org".to_string(),
        };
        let coordinate = Coordinate::new(12.971_598_765_432_1, 77.594_612_345_678_9);
        let record = ReviewRecord::new("Water is clear", coordinate, &session);

        assert_eq!(record.latitude, coordinate.latitude);
        assert_eq!(record.longitude, coordinate.longitude);
        assert_eq!(record.user_email, "field@example.org");
    }

    #[test]
    fn test_session_debug_hides_token() {
        let session = AuthSession {
            access_token: "secret-token".to_string(),
            user_id: "u-1".to_string(),
            email: "a@b.c".to_string(),
        };
        assert!(!format!("{session:?}").contains("secret-token"));
    }
}

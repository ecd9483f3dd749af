//! Reviews attached to a coordinate

use crate::client::StreamlyneClient;
use crate::error::ApiResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use streamlyne_engine::{AuthSession, ReviewRecord};
use streamlyne_geo::Coordinate;
use tracing::info;

const TABLE: &str = "reviews";

/// A stored review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Review text
    pub review: String,
    /// Author email
    pub user_email: String,
    /// Latitude of the reviewed feature
    pub latitude: f64,
    /// Longitude of the reviewed feature
    pub longitude: f64,
    /// Creation time, when the table records one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Reviews API interface
#[derive(Clone)]
pub struct ReviewsApi {
    client: StreamlyneClient,
}

impl ReviewsApi {
    /// Create a new reviews API interface
    pub(crate) fn new(client: StreamlyneClient) -> Self {
        Self { client }
    }

    /// All reviews stored for exactly this coordinate
    ///
    /// An empty list is a normal answer.
    pub async fn for_coordinate(&self, coordinate: Coordinate) -> ApiResult<Vec<Review>> {
        let url = self.query_url(coordinate);
        self.client.get_url(&url, None).await
    }

    /// Store a review with the author's bearer token
    pub async fn submit(&self, session: &AuthSession, record: &ReviewRecord) -> ApiResult<()> {
        self.client
            .insert(TABLE, std::slice::from_ref(record), Some(&session.access_token))
            .await?;
        info!(
            latitude = record.latitude,
            longitude = record.longitude,
            user_id = %record.user_id,
            "Review submitted"
        );
        Ok(())
    }

    fn query_url(&self, coordinate: Coordinate) -> String {
        format!(
            "{}/{TABLE}?select=*&latitude=eq.{}&longitude=eq.{}",
            self.client.config().rest_url(),
            coordinate.latitude,
            coordinate.longitude
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn client() -> StreamlyneClient {
        StreamlyneClient::with_config(ClientConfig::new("https://abc.supabase.co")).unwrap()
    }

    #[test]
    fn test_query_uses_exact_coordinate() {
        let url = client()
            .reviews()
            .query_url(Coordinate::new(12.971_598_765_432_1, 77.5946));
        assert_eq!(
            url,
            "https://abc.supabase.co/rest/v1/reviews?select=*\
             &latitude=eq.12.9715987654321&longitude=eq.77.5946"
        );
    }

    #[test]
    fn test_review_rows_parse() {
        let body = r#"[
            {"id": 1, "review": "Water is clear", "user_email": "a@b.c", "user_id": "u",
             "latitude": 12.9716, "longitude": 77.5946, "created_at": "2024-03-01T09:30:00+00:00"},
            {"id": 2, "review": "Pump noisy", "user_email": "d@e.f", "user_id": "v",
             "latitude": 12.9716, "longitude": 77.5946}
        ]"#;
        let reviews: Vec<Review> = serde_json::from_str(body).unwrap();

        assert_eq!(reviews.len(), 2);
        assert!(reviews[0].created_at.is_some());
        assert_eq!(reviews[1].created_at, None);
        assert_eq!(reviews[1].review, "Pump noisy");
    }

    #[test]
    fn test_empty_list_is_valid() {
        let reviews: Vec<Review> = serde_json::from_str("[]").unwrap();
        assert!(reviews.is_empty());
    }
}

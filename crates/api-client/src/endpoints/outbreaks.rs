//! Disease outbreak reports

use crate::client::StreamlyneClient;
use crate::error::ApiResult;
use streamlyne_engine::OutbreakRecord;
use tracing::info;

const TABLE: &str = "outbreaks";

/// Outbreaks API interface
#[derive(Clone)]
pub struct OutbreaksApi {
    client: StreamlyneClient,
}

impl OutbreaksApi {
    /// Create a new outbreaks API interface
    pub(crate) fn new(client: StreamlyneClient) -> Self {
        Self { client }
    }

    /// Store an outbreak report; no sign-in is needed
    pub async fn report(&self, record: &OutbreakRecord) -> ApiResult<()> {
        self.client
            .insert(TABLE, std::slice::from_ref(record), None)
            .await?;
        info!(
            disease = %record.disease,
            latitude = record.latitude,
            longitude = record.longitude,
            "Outbreak reported"
        );
        Ok(())
    }
}

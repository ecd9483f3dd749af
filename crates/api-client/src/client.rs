//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::{AuthApi, OutbreaksApi, ReviewsApi};
use crate::error::{ApiError, ApiResult};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use streamlyne_core::retry::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
use streamlyne_engine::{AnnotationSink, AuthSession, OutbreakRecord, ReviewRecord, SubmissionError};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// API key header for Supabase
const APIKEY_HEADER: &str = "apikey";

/// PostgREST preference header
const PREFER_HEADER: &str = "Prefer";

/// Streamlyne backend client
///
/// Wraps `reqwest` and adds:
/// - Retry with exponential backoff for idempotent reads
/// - Circuit breaker to stop hammering an unavailable backend
/// - Request correlation IDs for tracing
#[derive(Clone)]
pub struct StreamlyneClient {
    inner: Client,
    config: Arc<ClientConfig>,
    circuit_breaker: Arc<CircuitBreaker>,
}

impl StreamlyneClient {
    /// Create a new client with configuration from the environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("streamlyne-api-client/", env!("CARGO_PKG_VERSION"))),
        );

        if let Some(ref key) = config.anon_key {
            let value = HeaderValue::from_str(key)
                .map_err(|_| ApiError::config("anon key is not a valid header value"))?;
            default_headers.insert(APIKEY_HEADER, value);
        }

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
            circuit_breaker: Arc::new(CircuitBreaker::new(CircuitBreakerConfig::default())),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get circuit breaker state
    #[must_use]
    pub fn circuit_state(&self) -> CircuitState {
        self.circuit_breaker.state()
    }

    /// Reset the circuit breaker
    pub fn reset_circuit(&self) {
        self.circuit_breaker.reset();
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access password sign-in
    #[must_use]
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Access the `reviews` table
    #[must_use]
    pub fn reviews(&self) -> ReviewsApi {
        ReviewsApi::new(self.clone())
    }

    /// Access the `outbreaks` table
    #[must_use]
    pub fn outbreaks(&self) -> OutbreaksApi {
        OutbreaksApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Low-level HTTP methods with resilience
    // -------------------------------------------------------------------------

    /// GET an absolute URL, retrying transient failures
    #[instrument(skip(self, bearer))]
    pub async fn get_url<T: DeserializeOwned>(
        &self,
        url: &str,
        bearer: Option<&str>,
    ) -> ApiResult<T> {
        let request_id = Uuid::new_v4().to_string();
        self.check_circuit(&request_id, url)?;
        self.execute_with_retry(&request_id, url, bearer).await
    }

    /// POST a JSON body and decode the JSON response; never retried
    #[instrument(skip(self, body, bearer))]
    pub async fn post_url<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> ApiResult<T> {
        let request_id = Uuid::new_v4().to_string();
        self.check_circuit(&request_id, url)?;
        let response = self
            .send_recorded(&request_id, Method::POST, url, Some(body), bearer, None)
            .await?;
        response.json().await.map_err(ApiError::Request)
    }

    /// Insert rows into a REST table without reading them back; never retried
    #[instrument(skip(self, rows, bearer))]
    pub async fn insert<B: Serialize>(
        &self,
        table: &str,
        rows: &[B],
        bearer: Option<&str>,
    ) -> ApiResult<()> {
        let url = format!("{}/{table}", self.config.rest_url());
        let request_id = Uuid::new_v4().to_string();
        self.check_circuit(&request_id, &url)?;
        self.send_recorded(
            &request_id,
            Method::POST,
            &url,
            Some(rows),
            bearer,
            Some("return=minimal"),
        )
        .await?;
        debug!(request_id = %request_id, table, rows = rows.len(), "Rows inserted");
        Ok(())
    }

    fn check_circuit(&self, request_id: &str, url: &str) -> ApiResult<()> {
        if self.circuit_breaker.can_execute() {
            Ok(())
        } else {
            warn!(
                request_id = %request_id,
                url = %url,
                "Circuit breaker is open, rejecting request"
            );
            Err(ApiError::CircuitOpen)
        }
    }

    /// Execute a GET with retry logic
    async fn execute_with_retry<T: DeserializeOwned>(
        &self,
        request_id: &str,
        url: &str,
        bearer: Option<&str>,
    ) -> ApiResult<T> {
        let retry_config = &self.config.retry;
        let mut last_error: Option<ApiError> = None;

        for attempt in 0..retry_config.max_attempts {
            if attempt > 0 {
                let delay = retry_config.delay_for_attempt(attempt);
                debug!(
                    request_id = %request_id,
                    attempt = attempt,
                    delay_ms = delay.as_millis(),
                    "Retrying after delay"
                );
                tokio::time::sleep(delay).await;
            }

            let start = Instant::now();
            let result = match self
                .send_recorded(request_id, Method::GET, url, Option::<&()>::None, bearer, None)
                .await
            {
                Ok(response) => response.json::<T>().await.map_err(ApiError::Request),
                Err(e) => Err(e),
            };
            let elapsed = start.elapsed();

            match result {
                Ok(value) => {
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        elapsed_ms = elapsed.as_millis(),
                        "Request succeeded"
                    );
                    return Ok(value);
                }
                Err(e) if e.is_retryable() && attempt + 1 < retry_config.max_attempts => {
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        error = %e,
                        "Request failed, will retry"
                    );
                    last_error = Some(e);
                }
                Err(e) => {
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        error = %e,
                        "Request failed, not retrying"
                    );
                    return Err(e);
                }
            }
        }

        Err(ApiError::RetriesExhausted {
            attempts: retry_config.max_attempts,
            last_error: last_error.map_or_else(|| "Unknown error".to_string(), |e| e.to_string()),
        })
    }

    /// Send once and feed the outcome to the circuit breaker
    async fn send_recorded<B: Serialize + ?Sized>(
        &self,
        request_id: &str,
        method: Method,
        url: &str,
        body: Option<&B>,
        bearer: Option<&str>,
        prefer: Option<&str>,
    ) -> ApiResult<Response> {
        let result = self.send(request_id, method, url, body, bearer, prefer).await;
        match &result {
            Err(e) if e.is_retryable() => self.circuit_breaker.record_failure(),
            _ => self.circuit_breaker.record_success(),
        }
        result
    }

    /// Execute a single request and turn error statuses into [`ApiError::ApiResponse`]
    async fn send<B: Serialize + ?Sized>(
        &self,
        request_id: &str,
        method: Method,
        url: &str,
        body: Option<&B>,
        bearer: Option<&str>,
        prefer: Option<&str>,
    ) -> ApiResult<Response> {
        let mut request = self
            .inner
            .request(method, url)
            .header(X_REQUEST_ID, request_id);

        if let Some(token) = bearer.or(self.config.anon_key.as_deref()) {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(prefer) = prefer {
            request = request.header(PREFER_HEADER, prefer);
        }
        if let Some(b) = body {
            request = request.json(b);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(ApiError::api_response(status.as_u16(), &body))
        }
    }
}

impl AnnotationSink for StreamlyneClient {
    async fn submit_review(
        &self,
        session: &AuthSession,
        record: &ReviewRecord,
    ) -> Result<(), SubmissionError> {
        self.reviews().submit(session, record).await.map_err(Into::into)
    }

    async fn report_outbreak(&self, record: &OutbreakRecord) -> Result<(), SubmissionError> {
        self.outbreaks().report(record).await.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamlyne_core::retry::RetryConfig;
    use streamlyne_geo::Coordinate;

    /// Nothing listens on the discard port, so connects fail fast.
    fn unreachable_client() -> StreamlyneClient {
        let config = ClientConfig::new("http://127.0.0.1:9")
            .with_anon_key("anon")
            .with_retry(RetryConfig::no_retry());
        StreamlyneClient::with_config(config).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = StreamlyneClient::with_config(ClientConfig::development());
        assert!(client.is_ok());
        assert_eq!(client.unwrap().circuit_state(), CircuitState::Closed);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(StreamlyneClient::with_config(ClientConfig::new("ftp://x")).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_backend_becomes_submission_error() {
        let client = unreachable_client();
        let record = OutbreakRecord {
            disease: "Cholera".to_string(),
            description: "Two cases".to_string(),
            latitude: 12.9716,
            longitude: 77.5946,
        };

        let err = client.report_outbreak(&record).await.unwrap_err();
        assert!(err.message.contains("HTTP request failed"));
    }

    #[tokio::test]
    async fn test_open_circuit_short_circuits() {
        let client = unreachable_client();
        for _ in 0..CircuitBreakerConfig::default().failure_threshold {
            let _ = client
                .reviews()
                .for_coordinate(Coordinate::new(12.9716, 77.5946))
                .await;
        }
        assert_eq!(client.circuit_state(), CircuitState::Open);

        let err = client
            .reviews()
            .for_coordinate(Coordinate::new(12.9716, 77.5946))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::CircuitOpen));

        client.reset_circuit();
        assert_eq!(client.circuit_state(), CircuitState::Closed);
    }
}

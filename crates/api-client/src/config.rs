//! Configuration for the Streamlyne backend client
//!
//! The backend is a Supabase project: REST tables under `/rest/v1` and
//! password auth under `/auth/v1`.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use streamlyne_core::retry::RetryConfig;

/// Local Supabase started by the Supabase CLI
const LOCAL_SUPABASE_URL: &str = "http://localhost:54321";

/// Environment types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    #[default]
    Production,
}

impl Environment {
    /// Parse from `STREAMLYNE_ENV`
    pub fn from_env() -> Self {
        Self::parse(&env::var("STREAMLYNE_ENV").unwrap_or_default())
    }

    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "development" | "dev" | "local" => Self::Development,
            "staging" | "stage" => Self::Staging,
            _ => Self::Production,
        }
    }

    /// Retry policy for idempotent requests
    #[must_use]
    pub fn retry(self) -> RetryConfig {
        match self {
            Self::Development => RetryConfig::quick(),
            Self::Staging => RetryConfig::default(),
            Self::Production => RetryConfig::patient(),
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Supabase project URL, e.g. `https://abc.supabase.co`
    pub project_url: String,
    /// Supabase anonymous key
    pub anon_key: Option<String>,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Retry configuration for idempotent requests
    pub retry: RetryConfig,
    /// Current environment
    pub environment: Environment,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl ClientConfig {
    /// Configuration for a project URL with production defaults
    pub fn new(project_url: impl Into<String>) -> Self {
        Self {
            project_url: project_url.into().trim_end_matches('/').to_string(),
            anon_key: None,
            timeout: Duration::from_secs(30),
            retry: Environment::Production.retry(),
            environment: Environment::Production,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `STREAMLYNE_SUPABASE_URL` or `SUPABASE_URL`: project URL (required)
    /// - `SUPABASE_ANON_KEY`: anonymous key
    /// - `STREAMLYNE_ENV`: environment (development/staging/production)
    /// - `STREAMLYNE_TIMEOUT_SECS`: request timeout in seconds
    pub fn from_env() -> ApiResult<Self> {
        let environment = Environment::from_env();

        let project_url = env::var("STREAMLYNE_SUPABASE_URL")
            .or_else(|_| env::var("SUPABASE_URL"))
            .map_err(|_| ApiError::missing_env("STREAMLYNE_SUPABASE_URL or SUPABASE_URL"))?;

        let timeout = env::var("STREAMLYNE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map_or(Duration::from_secs(30), Duration::from_secs);

        let mut config = Self::new(project_url).with_environment(environment).with_timeout(timeout);
        config.anon_key = env::var("SUPABASE_ANON_KEY").ok();
        Ok(config)
    }

    /// Create development configuration (local Supabase)
    #[must_use]
    pub fn development() -> Self {
        Self {
            anon_key: env::var("SUPABASE_ANON_KEY").ok(),
            timeout: Duration::from_secs(10),
            ..Self::new(LOCAL_SUPABASE_URL).with_environment(Environment::Development)
        }
    }

    /// Base URL of the REST API
    #[must_use]
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.project_url)
    }

    /// Base URL of the auth API
    #[must_use]
    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.project_url)
    }

    /// Builder-style method to set the environment and its retry policy
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self.retry = environment.retry();
        self
    }

    /// Builder-style method to set anon key
    #[must_use]
    pub fn with_anon_key(mut self, key: impl Into<String>) -> Self {
        self.anon_key = Some(key.into());
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set retry config
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.project_url.is_empty() {
            return Err(ApiError::config("project_url cannot be empty"));
        }

        if !self.project_url.starts_with("http://") && !self.project_url.starts_with("https://") {
            return Err(ApiError::config("project_url must start with http:// or https://"));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        if self.retry.max_attempts == 0 {
            return Err(ApiError::config("retry.max_attempts must be at least 1"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let config = ClientConfig::new("https://abc.supabase.co/");
        assert_eq!(config.rest_url(), "https://abc.supabase.co/rest/v1");
        assert_eq!(config.auth_url(), "https://abc.supabase.co/auth/v1");
    }

    #[test]
    fn test_development_config() {
        let config = ClientConfig::development();
        assert!(config.project_url.contains("localhost"));
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(Environment::parse("DEV"), Environment::Development);
        assert_eq!(Environment::parse("stage"), Environment::Staging);
        assert_eq!(Environment::parse(""), Environment::Production);
        assert_eq!(Environment::Production.retry().max_attempts, 5);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::new("https://abc.supabase.co")
            .with_anon_key("anon")
            .with_timeout(Duration::from_secs(60))
            .with_retry(RetryConfig::no_retry());

        assert_eq!(config.anon_key.as_deref(), Some("anon"));
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.retry.max_attempts, 1);
    }

    #[test]
    fn test_validation() {
        assert!(ClientConfig::new("https://abc.supabase.co").validate().is_ok());
        assert!(ClientConfig::new("").validate().is_err());
        assert!(ClientConfig::new("abc.supabase.co").validate().is_err());
        assert!(ClientConfig::new("https://abc.supabase.co")
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }
}

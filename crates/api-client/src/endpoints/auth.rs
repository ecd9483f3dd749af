//! Password sign-in

use crate::client::StreamlyneClient;
use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use streamlyne_core::validation::Validator;
use streamlyne_engine::AuthSession;
use tracing::info;

/// Shown when either sign-in field is blank
pub const BOTH_FIELDS_REQUIRED: &str = "Please fill in both fields";

/// Auth API interface
#[derive(Clone)]
pub struct AuthApi {
    client: StreamlyneClient,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl TokenResponse {
    fn into_session(self, fallback_email: &str) -> AuthSession {
        AuthSession {
            access_token: self.access_token,
            user_id: self.user.id,
            email: self.user.email.unwrap_or_else(|| fallback_email.to_string()),
        }
    }
}

impl AuthApi {
    /// Create a new auth API interface
    pub(crate) fn new(client: StreamlyneClient) -> Self {
        Self { client }
    }

    /// Sign in with email and password
    ///
    /// Blank fields are rejected locally with [`ApiError::Validation`]
    /// before any request is made.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> ApiResult<AuthSession> {
        let email = email.trim();
        validate_credentials(email, password)?;

        let url = format!("{}/token?grant_type=password", self.client.config().auth_url());
        let response: TokenResponse = self
            .client
            .post_url(&url, &PasswordGrant { email, password }, None)
            .await?;

        let session = response.into_session(email);
        info!(user_id = %session.user_id, "Signed in");
        Ok(session)
    }
}

fn validate_credentials(email: &str, password: &str) -> ApiResult<()> {
    let blank = email.trim().is_empty() || password.is_empty();
    let result = Validator::new()
        .custom("credentials", || blank.then(|| BOTH_FIELDS_REQUIRED.to_string()))
        .validate();

    if result.is_valid() {
        Ok(())
    } else {
        Err(ApiError::Validation(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    #[test]
    fn test_blank_fields_are_rejected() {
        for (email, password) in [("", "secret"), ("a@b.c", ""), ("  ", "")] {
            let err = validate_credentials(email, password).unwrap_err();
            assert_eq!(err.user_message(), "credentials: Please fill in both fields");
        }
        assert!(validate_credentials("a@b.c", "secret").is_ok());
    }

    #[test]
    fn test_token_response_parsing() {
        let body = r#"{
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r",
            "user": {"id": "9f1c", "email": "field@example.org", "role": "authenticated"}
        }"#;
        let response: TokenResponse = serde_json::from_str(body).unwrap();
        let session = response.into_session("typed@example.org");

        assert_eq!(session.access_token, "jwt");
        assert_eq!(session.user_id, "9f1c");
        assert_eq!(session.email, "field@example.org");
    }

    #[test]
    fn test_missing_email_falls_back_to_typed() {
        let body = r#"{"access_token": "jwt", "user": {"id": "9f1c"}}"#;
        let response: TokenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.into_session("typed@example.org").email, "typed@example.org");
    }

    #[test]
    fn test_sign_in_validates_before_network() {
        let client =
            StreamlyneClient::with_config(ClientConfig::new("http://127.0.0.1:9")).unwrap();
        let result = tokio_test::block_on(client.auth().sign_in_with_password("", ""));
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}

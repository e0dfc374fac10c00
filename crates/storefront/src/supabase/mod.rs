//! Client for the hosted auth service.
//!
//! Storefront callers authenticate with an access token issued by the
//! hosted auth service. The token is resolved to a user by calling
//! `GET {SUPABASE_URL}/auth/v1/user`.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use maison_core::UserId;

use crate::config::SupabaseConfig;

/// Errors that can occur when interacting with the auth service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The access token is missing, malformed, expired or revoked.
    #[error("invalid access token")]
    InvalidToken,

    /// The service returned an unexpected error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to build a request or parse a response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// A user resolved from an access token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
}

/// Auth service client.
#[derive(Clone)]
pub struct SupabaseAuthClient {
    inner: Arc<SupabaseAuthClientInner>,
}

struct SupabaseAuthClientInner {
    client: reqwest::Client,
    user_url: Url,
}

impl SupabaseAuthClient {
    /// Create a new auth client.
    ///
    /// # Errors
    ///
    /// Returns error if the key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &SupabaseConfig) -> Result<Self, AuthError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(config.anon_key.expose_secret())
                .map_err(|e| AuthError::Parse(format!("Invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(10))
            .build()?;

        let user_url = config
            .url
            .join("auth/v1/user")
            .map_err(|e| AuthError::Parse(format!("Invalid auth URL: {e}")))?;

        Ok(Self {
            inner: Arc::new(SupabaseAuthClientInner { client, user_url }),
        })
    }

    /// Resolve an access token to its user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` when the service rejects the token.
    #[tracing::instrument(skip_all)]
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .inner
            .client
            .get(self.inner.user_url.clone())
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| AuthError::Parse(format!("Failed to parse user: {e}")));
        }

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(AuthError::InvalidToken);
        }

        let message = response.text().await.unwrap_or_default();
        Err(AuthError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
#[must_use]
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_user_deserializes() {
        let user: AuthUser = serde_json::from_str(
            r#"{"id":"6f1c2a52-8e0b-4b0a-9a43-2d6f0c3e9a11","email":"a@example.com","role":"authenticated"}"#,
        )
        .unwrap();
        assert_eq!(user.email.as_deref(), Some("a@example.com"));
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("bearer  abc "), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc"), None);
    }

    #[test]
    fn test_user_url_is_joined() {
        let config = SupabaseConfig {
            url: Url::parse("https://abc.supabase.co").unwrap(),
            anon_key: secrecy::SecretString::from("anon"),
        };
        let client = SupabaseAuthClient::new(&config).unwrap();
        assert_eq!(
            client.inner.user_url.as_str(),
            "https://abc.supabase.co/auth/v1/user"
        );
    }
}

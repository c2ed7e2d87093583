//! HTTP client for the identity provider.
//!
//! Sign-in is redirect-based OAuth: the application navigates the browser to
//! [`IdentityApi::authorize_url`], the provider redirects back to the
//! configured callback with a one-time code, and [`IdentityApi::exchange_code`]
//! turns that code into a session.

use std::fmt::Write;

use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::{AuthUser, Session};
use crate::config::BackendConfig;
use crate::error::ApiError;

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex CSRF state token.
#[must_use]
pub fn generate_state_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Query parameters delivered to the callback route by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CallbackParams {
    /// One-time authorization code.
    pub code: String,
    /// Echo of the CSRF state token sent with the authorize redirect.
    pub state: Option<String>,
}

/// Provider operations the gateway depends on.
#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// Build the provider authorization URL for a redirect-based sign-in.
    fn authorize_url(&self, provider: &str, state: &str) -> String;

    /// Exchange a callback authorization code for a session.
    async fn exchange_code(&self, code: &str) -> Result<Session, ApiError>;

    /// Obtain a fresh session from a refresh token.
    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, ApiError>;

    /// Revoke the session at the provider.
    async fn sign_out(&self, access_token: &str) -> Result<(), ApiError>;
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    /// Validity window in seconds.
    expires_in: i64,
    user: WireUser,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: Uuid,
    email: Option<String>,
    #[serde(default)]
    user_metadata: serde_json::Value,
}

impl TokenResponse {
    fn into_session(self, now: OffsetDateTime) -> Session {
        let name = self.user.user_metadata["full_name"]
            .as_str()
            .map(ToOwned::to_owned);
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: now + time::Duration::seconds(self.expires_in),
            user: AuthUser { id: self.user.id, name, email: self.user.email },
        }
    }
}

// =============================================================================
// HTTP IMPLEMENTATION
// =============================================================================

/// reqwest-backed [`IdentityApi`] against the backend's `/auth/v1` surface.
#[derive(Clone)]
pub struct HttpIdentityApi {
    config: BackendConfig,
    client: reqwest::Client,
}

impl HttpIdentityApi {
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self { config, client: reqwest::Client::new() }
    }

    async fn token_request(&self, grant_type: &str, body: serde_json::Value) -> Result<Session, ApiError> {
        let url = format!("{}/auth/v1/token?grant_type={grant_type}", self.config.base_url);
        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            // A provider outage is transient; only 4xx means "rejected".
            if status.is_server_error() {
                return Err(ApiError::Network(format!("{status}: {body}")));
            }
            return Err(ApiError::Auth(format!("{status}: {body}")));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::Auth(format!("unexpected token response: {e}")))?;
        Ok(token.into_session(OffsetDateTime::now_utc()))
    }
}

#[async_trait]
impl IdentityApi for HttpIdentityApi {
    fn authorize_url(&self, provider: &str, state: &str) -> String {
        format!(
            "{}/auth/v1/authorize?provider={provider}&redirect_to={}&state={state}",
            self.config.base_url, self.config.redirect_uri
        )
    }

    async fn exchange_code(&self, code: &str) -> Result<Session, ApiError> {
        self.token_request("authorization_code", serde_json::json!({ "auth_code": code }))
            .await
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, ApiError> {
        self.token_request("refresh_token", serde_json::json!({ "refresh_token": refresh_token }))
            .await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ApiError> {
        let url = format!("{}/auth/v1/logout", self.config.base_url);
        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {access_token}"))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            if status.is_server_error() {
                return Err(ApiError::Network(format!("{status}: {body}")));
            }
            return Err(ApiError::Auth(format!("{status}: {body}")));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

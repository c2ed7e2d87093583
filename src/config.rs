//! Backend endpoint and key configuration.
//!
//! The hosted backend serves both the identity endpoints (`/auth/v1`) and
//! the relational query interface (`/rest/v1`) under one base URL, so a
//! single config struct covers both clients.

/// Backend configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the hosted backend, no trailing slash.
    pub base_url: String,
    /// Publishable API key sent with every request.
    pub api_key: String,
    /// Absolute URL the OAuth flow redirects back to (the `/auth/callback`
    /// route of the host application).
    pub redirect_uri: String,
}

impl BackendConfig {
    /// Load from `TRIPKIT_BACKEND_URL`, `TRIPKIT_API_KEY`,
    /// `TRIPKIT_REDIRECT_URI`. Returns `None` if any are missing
    /// (auth and data access will be disabled).
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("TRIPKIT_BACKEND_URL").ok()?;
        let api_key = std::env::var("TRIPKIT_API_KEY").ok()?;
        let redirect_uri = std::env::var("TRIPKIT_REDIRECT_URI").ok()?;
        Some(Self { base_url: base_url.trim_end_matches('/').to_owned(), api_key, redirect_uri })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

//! Authentication — identity-provider client and session gateway.
//!
//! ARCHITECTURE
//! ============
//! Two layers isolate the rest of the crate from the provider's API shape:
//! [`api`] speaks HTTP to the provider (authorize URL, code exchange, token
//! refresh, revocation), while [`gateway`] is the façade the application
//! consumes: a cached current session plus a subscriber list notified on
//! every sign-in, sign-out, and refresh.

pub mod api;
pub mod gateway;

pub use api::{CallbackParams, HttpIdentityApi, IdentityApi};
pub use gateway::{AuthGateway, AuthSubscription};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Authenticated principal, projected out of the session. Read-only; never
/// persisted beyond process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Stable identifier assigned by the identity provider.
    pub id: Uuid,
    /// Display name, if the provider supplied one.
    pub name: Option<String>,
    /// Email address, if the provider supplied one.
    pub email: Option<String>,
}

/// Provider-issued credential bundle with a validity window.
///
/// Owned exclusively by the gateway; replaced wholesale on every auth-state
/// change, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token attached to backend requests.
    pub access_token: String,
    /// Token used to obtain a fresh session once the access token expires.
    pub refresh_token: String,
    /// End of the access token's validity window.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    /// The authenticated principal.
    pub user: AuthUser,
}

impl Session {
    /// Whether the access token's validity window has passed at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }
}

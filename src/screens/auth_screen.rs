//! Sign-in screen — begins the redirect-based OAuth flow.

use crate::auth::AuthGateway;

/// The single external provider this application signs in with.
pub const OAUTH_PROVIDER: &str = "google";

/// Start sign-in: returns the provider authorize URL. The host navigates
/// the browser there; the flow completes on the callback screen.
#[must_use]
pub fn begin_sign_in(gateway: &AuthGateway) -> String {
    gateway.sign_in_with_provider(OAUTH_PROVIDER)
}

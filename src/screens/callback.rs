//! OAuth callback — finishes sign-in and decides where to land.

use crate::auth::{AuthGateway, CallbackParams};
use crate::error::ApiError;
use crate::guard::paths;

/// Result of processing the provider redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackOutcome {
    /// Where to send the user next: the landing page on success, back to
    /// sign-in otherwise.
    pub redirect_to: &'static str,
    /// Why sign-in failed, when it did.
    pub error: Option<ApiError>,
}

/// Complete the OAuth flow with the callback params. Never panics the
/// shell: a failed exchange routes back to the sign-in screen with the
/// error attached.
pub async fn complete_sign_in(gateway: &AuthGateway, params: &CallbackParams) -> CallbackOutcome {
    match gateway.complete_callback(params).await {
        Ok(_) => CallbackOutcome { redirect_to: paths::LANDING, error: None },
        Err(error) => {
            tracing::warn!(error = %error, "oauth callback failed");
            CallbackOutcome { redirect_to: paths::SIGN_IN, error: Some(error) }
        }
    }
}

#[cfg(test)]
#[path = "callback_test.rs"]
mod tests;

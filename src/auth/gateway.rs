//! Auth gateway — cached session plus change subscriptions.
//!
//! ARCHITECTURE
//! ============
//! The gateway owns the one mutable copy of the current session. Every
//! state change (callback completion, refresh, sign-out) replaces it
//! wholesale and synchronously notifies subscribers, so observers only
//! ever see whole sessions, never partial updates.
//!
//! TRADE-OFFS
//! ==========
//! Sign-out clears local state and notifies before the provider revocation
//! round-trips. A revocation failure is still reported to the caller, but
//! the UI never appears stuck logged in behind a failing network.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::auth::api::{CallbackParams, IdentityApi, generate_state_token};
use crate::auth::Session;
use crate::error::ApiError;

type Listener = Arc<dyn Fn(Option<&Session>) + Send + Sync>;

struct GatewayInner {
    session: Option<Session>,
    /// Outstanding CSRF state token from the last authorize redirect.
    pending_state: Option<String>,
    listeners: HashMap<u64, Listener>,
    next_listener_id: u64,
}

/// Façade over the identity provider. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct AuthGateway {
    api: Arc<dyn IdentityApi>,
    inner: Arc<Mutex<GatewayInner>>,
}

/// Subscription handle returned by [`AuthGateway::subscribe`].
/// Dropping it removes the listener.
pub struct AuthSubscription {
    inner: Weak<Mutex<GatewayInner>>,
    id: u64,
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.listeners.remove(&self.id);
        }
    }
}

impl AuthGateway {
    #[must_use]
    pub fn new(api: Arc<dyn IdentityApi>) -> Self {
        Self {
            api,
            inner: Arc::new(Mutex::new(GatewayInner {
                session: None,
                pending_state: None,
                listeners: HashMap::new(),
                next_listener_id: 0,
            })),
        }
    }

    /// Point-in-time read of the cached session. Never touches the network.
    #[must_use]
    pub fn current_session(&self) -> Option<Session> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.session.clone()
    }

    /// Register a change listener. Fires once immediately with the current
    /// state, and again on every sign-in, sign-out, and refresh.
    pub fn subscribe<F>(&self, on_change: F) -> AuthSubscription
    where
        F: Fn(Option<&Session>) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(on_change);
        let (id, current) = {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            let id = inner.next_listener_id;
            inner.next_listener_id += 1;
            inner.listeners.insert(id, Arc::clone(&listener));
            (id, inner.session.clone())
        };
        // Immediate fire happens outside the lock so the callback may read
        // the gateway freely.
        listener(current.as_ref());
        AuthSubscription { inner: Arc::downgrade(&self.inner), id }
    }

    /// Begin a redirect-based OAuth sign-in. Returns the provider authorize
    /// URL; navigating the browser there is the caller's effect. The flow
    /// completes on the callback route via [`Self::complete_callback`].
    #[must_use]
    pub fn sign_in_with_provider(&self, provider: &str) -> String {
        let state = generate_state_token();
        let url = self.api.authorize_url(provider, &state);
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.pending_state = Some(state);
        url
    }

    /// Finish the OAuth flow with the params delivered to the callback
    /// route. Verifies the CSRF state echo, exchanges the code, installs
    /// the session, and notifies subscribers.
    pub async fn complete_callback(&self, params: &CallbackParams) -> Result<Session, ApiError> {
        let expected = {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.pending_state.take()
        };
        if let Some(expected) = expected {
            if params.state.as_deref() != Some(expected.as_str()) {
                return Err(ApiError::Auth("oauth state mismatch".into()));
            }
        }

        let session = self.api.exchange_code(&params.code).await?;
        self.replace_session(Some(session.clone()));
        Ok(session)
    }

    /// Initial session load from a persisted refresh token. A failed fetch
    /// is treated as "no session" — a session check must never take the
    /// application shell down.
    pub async fn restore_session(&self, refresh_token: Option<&str>) {
        let restored = match refresh_token {
            Some(token) => match self.api.refresh_session(token).await {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::debug!(error = %e, "session restore failed, treating as signed out");
                    None
                }
            },
            None => None,
        };
        self.replace_session(restored);
    }

    /// Sign out. Local state is cleared and subscribers notified before the
    /// provider call; a provider failure is propagated for display only.
    /// Idempotent: signing out with no session is a no-op.
    pub async fn sign_out(&self) -> Result<(), ApiError> {
        let previous = {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.session.take()
        };
        let Some(previous) = previous else {
            return Ok(());
        };
        self.notify();

        if let Err(e) = self.api.sign_out(&previous.access_token).await {
            tracing::warn!(error = %e, "provider sign-out failed, local session already cleared");
            return Err(e);
        }
        Ok(())
    }

    /// Replace the session after a provider-confirmed refresh.
    pub fn apply_refreshed(&self, session: Session) {
        self.replace_session(Some(session));
    }

    fn replace_session(&self, session: Option<Session>) {
        {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.session = session;
        }
        self.notify();
    }

    fn notify(&self) {
        let (listeners, session) = {
            let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            (inner.listeners.values().cloned().collect::<Vec<_>>(), inner.session.clone())
        };
        for listener in listeners {
            listener(session.as_ref());
        }
    }
}

#[cfg(test)]
#[path = "gateway_test.rs"]
mod tests;

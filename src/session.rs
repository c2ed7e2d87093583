//! Session store — the single authoritative `{session, user, loading}`
//! holder for the application process.
//!
//! DESIGN
//! ======
//! The store is an explicitly owned object passed to consumers, not a
//! free-floating global; its lifecycle is tied to the application root.
//! It mirrors the auth gateway: `initialize` performs the one initial
//! session fetch (failure means "signed out", never an error), then keeps a
//! gateway subscription for as long as the store lives. Observers are
//! notified synchronously with whole snapshots, so no reader ever sees a
//! half-updated `{session, user}` pair.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::auth::{AuthGateway, AuthSubscription, AuthUser, Session};

/// Atomic view of the store's state.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub session: Option<Session>,
    pub user: Option<AuthUser>,
    /// True until the initial session fetch resolves. While set, the
    /// authentication state is unknown and the route guard must not
    /// render or redirect.
    pub loading: bool,
}

impl SessionSnapshot {
    #[must_use]
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }
}

type Listener = Arc<dyn Fn(&SessionSnapshot) + Send + Sync>;

struct StoreInner {
    snapshot: SessionSnapshot,
    initialized: bool,
    listeners: HashMap<u64, Listener>,
    next_listener_id: u64,
    /// Held for the store's lifetime; dropping the last store handle
    /// unsubscribes from the gateway.
    gateway_sub: Option<AuthSubscription>,
}

/// Process-wide session state holder. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<StoreInner>>,
}

/// Observer handle returned by [`SessionStore::subscribe`]. Dropping it
/// removes the observer, so a destroyed view is never updated.
pub struct SessionSubscription {
    inner: Weak<Mutex<StoreInner>>,
    id: u64,
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.listeners.remove(&self.id);
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                snapshot: SessionSnapshot { session: None, user: None, loading: true },
                initialized: false,
                listeners: HashMap::new(),
                next_listener_id: 0,
                gateway_sub: None,
            })),
        }
    }

    /// One-time initialization: restore the session from the persisted
    /// refresh token (if any), then track every subsequent gateway change.
    /// Until this resolves, [`SessionSnapshot::loading`] stays true.
    /// Subsequent calls are no-ops.
    pub async fn initialize(&self, gateway: &AuthGateway, stored_refresh_token: Option<&str>) {
        {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            if inner.initialized {
                return;
            }
            inner.initialized = true;
        }

        // The initial fetch; the gateway swallows failures into "no session".
        gateway.restore_session(stored_refresh_token).await;

        // The subscription fires immediately with the restored state, which
        // applies it and clears `loading`.
        let weak = Arc::downgrade(&self.inner);
        let sub = gateway.subscribe(move |session| {
            if let Some(inner) = weak.upgrade() {
                apply_change(&inner, session);
            }
        });

        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.gateway_sub = Some(sub);
    }

    /// Atomic read of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.snapshot.clone()
    }

    /// Register an observer notified synchronously on every state change.
    pub fn subscribe<F>(&self, on_change: F) -> SessionSubscription
    where
        F: Fn(&SessionSnapshot) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let id = inner.next_listener_id;
        inner.next_listener_id += 1;
        inner.listeners.insert(id, Arc::new(on_change));
        SessionSubscription { inner: Arc::downgrade(&self.inner), id }
    }
}

/// Replace `{session, user}` wholesale, clear `loading`, notify observers.
fn apply_change(inner: &Mutex<StoreInner>, session: Option<&Session>) {
    let (listeners, snapshot) = {
        let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.snapshot = SessionSnapshot {
            session: session.cloned(),
            user: session.map(|s| s.user.clone()),
            loading: false,
        };
        (inner.listeners.values().cloned().collect::<Vec<_>>(), inner.snapshot.clone())
    };
    for listener in listeners {
        listener(&snapshot);
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

//! Route guard — per-route access control.
//!
//! DESIGN
//! ======
//! The access decision is a pure function of the session snapshot and the
//! route's policy, so it is unit-testable without a rendering environment.
//! The navigation side effect lives in a thin effect-runner ([`run`])
//! behind the [`Navigator`] trait. Redirects are history *replaces*:
//! back-navigation must not return to a disallowed screen.
//!
//! The decision is re-evaluated on every change to the session snapshot or
//! the route, never computed once at mount — callers re-run [`evaluate`]
//! from their session-store observer.

use crate::session::SessionSnapshot;

/// Well-known redirect targets.
pub mod paths {
    /// Authenticated landing page.
    pub const LANDING: &str = "/";
    /// Sign-in page.
    pub const SIGN_IN: &str = "/auth";
}

/// Access requirement attached to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Must be authenticated; otherwise redirect to sign-in.
    RequireSession,
    /// Must be unauthenticated; otherwise redirect to the landing page.
    RequireGuest,
    /// No requirement.
    Public,
}

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    /// Session status unknown (store still loading). Render nothing and do
    /// not redirect.
    Pending,
    /// Requirement satisfied; render the screen.
    Allowed,
    /// Requirement violated; navigate away and render nothing.
    Redirecting {
        /// History-replace target.
        target: &'static str,
    },
}

/// Decide whether the current session satisfies `policy`.
#[must_use]
pub fn evaluate(policy: AccessPolicy, snapshot: &SessionSnapshot) -> GuardState {
    if matches!(policy, AccessPolicy::Public) {
        return GuardState::Allowed;
    }
    if snapshot.loading {
        return GuardState::Pending;
    }

    let has_session = snapshot.has_session();
    let require_session = matches!(policy, AccessPolicy::RequireSession);
    if require_session == has_session {
        GuardState::Allowed
    } else if has_session {
        // Guest-only page hit while signed in.
        GuardState::Redirecting { target: paths::LANDING }
    } else {
        GuardState::Redirecting { target: paths::SIGN_IN }
    }
}

/// Navigation effect executed by the host.
pub trait Navigator {
    /// Replace the current history entry with `path`.
    fn replace(&self, path: &str);
}

/// Execute the navigation side effect for `state`. Returns whether the
/// guarded screen should render.
pub fn run(state: &GuardState, navigator: &dyn Navigator) -> bool {
    match state {
        GuardState::Allowed => true,
        GuardState::Pending => false,
        GuardState::Redirecting { target } => {
            navigator.replace(target);
            false
        }
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;

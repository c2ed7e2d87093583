//! Routing surface — path parsing and guarded resolution.
//!
//! DESIGN
//! ======
//! Paths map to a closed [`Route`] enum; unmatched paths become
//! [`Route::NotFound`] rather than an error. [`resolve`] composes parsing
//! with the guard decision, so navigation is one pure call that the host
//! pairs with a [`crate::guard::Navigator`] effect.

use uuid::Uuid;

use crate::guard::{self, AccessPolicy, GuardState};
use crate::session::SessionSnapshot;

/// Screens addressable by URL path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/` — authenticated landing with the trips list.
    Home,
    /// `/auth` — guest-only sign-in screen.
    Auth,
    /// `/auth/callback` — public OAuth return target.
    AuthCallback,
    /// `/trips/new` — trip creation form.
    NewTrip,
    /// `/trip/:id` — trip detail with a day preview.
    TripDetail(Uuid),
    /// `/trip/itinerary/:id` — full itinerary for a trip.
    Itinerary(Uuid),
    /// Anything else.
    NotFound,
}

impl Route {
    /// Parse a URL path. Query strings and fragments are ignored.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<&str> = path.trim_matches('/').split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["auth"] => Self::Auth,
            ["auth", "callback"] => Self::AuthCallback,
            ["trips", "new"] => Self::NewTrip,
            ["trip", "itinerary", id] => Uuid::parse_str(id).map_or(Self::NotFound, Self::Itinerary),
            ["trip", id] => Uuid::parse_str(id).map_or(Self::NotFound, Self::TripDetail),
            _ => Self::NotFound,
        }
    }

    /// Access requirement for the route.
    #[must_use]
    pub fn policy(self) -> AccessPolicy {
        match self {
            Self::Home | Self::NewTrip | Self::TripDetail(_) | Self::Itinerary(_) => AccessPolicy::RequireSession,
            Self::Auth => AccessPolicy::RequireGuest,
            Self::AuthCallback | Self::NotFound => AccessPolicy::Public,
        }
    }
}

/// Outcome of navigating to a path under the current session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub route: Route,
    pub guard: GuardState,
}

/// Resolve a path: parse the route and evaluate its guard against the
/// session snapshot. Re-run on every snapshot change.
#[must_use]
pub fn resolve(path: &str, snapshot: &SessionSnapshot) -> Resolution {
    let route = Route::parse(path);
    let guard = guard::evaluate(route.policy(), snapshot);
    Resolution { route, guard }
}

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;

//! Home — the authenticated landing screen with the trips list.

use crate::backend::TripSummary;
use crate::cache::QueryState;
use crate::screens::redirect_for_error;
use crate::trips::TripStore;

/// View state for the landing screen.
#[derive(Debug, Clone)]
pub struct HomeView {
    /// Trips ordered by last update, newest first.
    pub trips: QueryState<Vec<TripSummary>>,
}

impl HomeView {
    pub async fn load(store: &TripStore) -> Self {
        Self { trips: store.trips().await }
    }

    /// True when the list loaded and came back empty (first-run state).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trips.data.as_ref().is_some_and(|trips| trips.is_empty())
    }

    /// Sign-in redirect if the list read was denied.
    #[must_use]
    pub fn redirect(&self) -> Option<&'static str> {
        redirect_for_error(self.trips.error.as_ref())
    }
}

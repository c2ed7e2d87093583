//! Trip detail — one trip plus a capped preview of its days.

use uuid::Uuid;

use crate::backend::{Trip, TripDay};
use crate::cache::QueryState;
use crate::error::ApiError;
use crate::screens::redirect_for_error;
use crate::trips::TripStore;

/// Days shown on the detail screen before the full itinerary link.
pub const DAY_PREVIEW_LIMIT: u32 = 3;

/// View state for the trip detail screen.
#[derive(Debug, Clone)]
pub struct TripDetailView {
    pub trip: QueryState<Trip>,
    pub days: QueryState<Vec<TripDay>>,
}

impl TripDetailView {
    pub async fn load(store: &TripStore, trip_id: Uuid) -> Self {
        let (trip, days) = tokio::join!(store.trip(trip_id), store.trip_days(trip_id, Some(DAY_PREVIEW_LIMIT)));
        Self { trip, days }
    }

    /// The trip does not exist: rendered as an explicit empty state, not
    /// an error banner.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.trip.error == Some(ApiError::NotFound)
    }

    /// Aggregate spend across the previewed days, for the budget strip.
    #[must_use]
    pub fn expense_total(&self) -> f64 {
        self.days
            .data
            .as_ref()
            .map_or(0.0, |days| days.iter().map(|day| day.expense_total).sum())
    }

    /// Sign-in redirect if either read was denied.
    #[must_use]
    pub fn redirect(&self) -> Option<&'static str> {
        redirect_for_error(self.trip.error.as_ref()).or_else(|| redirect_for_error(self.days.error.as_ref()))
    }
}

#[cfg(test)]
#[path = "trip_detail_test.rs"]
mod tests;

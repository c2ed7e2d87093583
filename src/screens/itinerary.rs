//! Full itinerary — every day of a trip, uncapped.

use uuid::Uuid;

use crate::backend::TripDay;
use crate::cache::QueryState;
use crate::screens::redirect_for_error;
use crate::trips::TripStore;

/// View state for the full-itinerary screen.
#[derive(Debug, Clone)]
pub struct ItineraryView {
    pub trip_id: Uuid,
    /// All days, ordered by day index.
    pub days: QueryState<Vec<TripDay>>,
}

impl ItineraryView {
    pub async fn load(store: &TripStore, trip_id: Uuid) -> Self {
        Self { trip_id, days: store.trip_days(trip_id, None).await }
    }

    /// Sign-in redirect if the read was denied.
    #[must_use]
    pub fn redirect(&self) -> Option<&'static str> {
        redirect_for_error(self.days.error.as_ref())
    }
}

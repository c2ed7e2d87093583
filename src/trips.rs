//! Trip store — cached reads and the creation mutation.
//!
//! DESIGN
//! ======
//! One [`QueryCache`] per entity kind, keyed by the query's scoping
//! parameters, so two screens asking the same question share one request
//! and one cached answer. Creation does not write the cache optimistically:
//! it marks the trips-list slot stale and lets the next read refetch.

use std::sync::Arc;

use uuid::Uuid;

use crate::backend::{NewTrip, Trip, TripApi, TripDay, TripSummary};
use crate::cache::{QueryCache, QueryState};
use crate::error::ApiError;

/// Scoping key for day queries: trip id plus optional row cap.
type DaysKey = (Uuid, Option<u32>);

/// Read/write surface for trip data. Cheap to clone; clones share caches.
#[derive(Clone)]
pub struct TripStore {
    api: Arc<dyn TripApi>,
    trips: QueryCache<(), Vec<TripSummary>>,
    details: QueryCache<Uuid, Trip>,
    days: QueryCache<DaysKey, Vec<TripDay>>,
}

impl TripStore {
    #[must_use]
    pub fn new(api: Arc<dyn TripApi>) -> Self {
        Self {
            api,
            trips: QueryCache::new(),
            details: QueryCache::new(),
            days: QueryCache::new(),
        }
    }

    /// Trips visible to the current user, newest update first.
    pub async fn trips(&self) -> QueryState<Vec<TripSummary>> {
        let api = Arc::clone(&self.api);
        self.trips
            .fetch((), move || {
                let api = Arc::clone(&api);
                async move { api.list_trips().await }
            })
            .await
    }

    /// Single trip by id.
    pub async fn trip(&self, trip_id: Uuid) -> QueryState<Trip> {
        let api = Arc::clone(&self.api);
        self.details
            .fetch(trip_id, move || {
                let api = Arc::clone(&api);
                async move { api.trip_detail(trip_id).await }
            })
            .await
    }

    /// Days of a trip, ordered by day index, optionally capped.
    pub async fn trip_days(&self, trip_id: Uuid, limit: Option<u32>) -> QueryState<Vec<TripDay>> {
        let api = Arc::clone(&self.api);
        self.days
            .fetch((trip_id, limit), move || {
                let api = Arc::clone(&api);
                async move { api.trip_days(trip_id, limit).await }
            })
            .await
    }

    /// Create a trip and its days. The date invariant is checked here,
    /// before anything reaches the network; on success the trips-list
    /// cache is invalidated so the next read refetches.
    pub async fn create_trip(&self, new_trip: &NewTrip) -> Result<Uuid, ApiError> {
        new_trip.validate()?;
        let trip_id = self.api.create_trip_with_days(new_trip).await?;
        self.trips.invalidate(&());
        Ok(trip_id)
    }
}

#[cfg(test)]
#[path = "trips_test.rs"]
mod tests;

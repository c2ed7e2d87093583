//! Remote backend — entity models and the query/RPC client trait.
//!
//! ARCHITECTURE
//! ============
//! The backend owns all trip data; the client holds transient cached
//! copies only. Reads are column-projected selects with equality/ordering
//! filters; the single write is the `create_trip_with_days` remote
//! procedure, which atomically creates a trip plus one day per calendar
//! date in `start..=end`. Day indexes are assigned server-side — the
//! client never constructs them.

pub mod rest;

pub use rest::RestTripApi;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::error::ApiError;

/// Currency applied when trip creation leaves the code empty.
pub const DEFAULT_CURRENCY: &str = "THB";

/// Row of the trips list, ordered by `updated_at` descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    pub id: Uuid,
    pub title: String,
    pub start_date: Date,
    pub end_date: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub owner_id: Uuid,
    /// Aggregate count of activities across the trip.
    pub activity_count: i64,
}

/// Full trip record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub title: String,
    pub start_date: Date,
    pub end_date: Date,
    pub currency_code: String,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub owner_id: Uuid,
}

/// One day of a trip. `day_index` values are dense, contiguous, zero-based,
/// and increase with `date` within a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDay {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub day_index: i32,
    pub date: Date,
    pub title: String,
    /// Aggregate count of activities scheduled on this day.
    pub activity_count: i64,
    /// Aggregate sum of expense amounts recorded on this day.
    pub expense_total: f64,
}

/// Input to trip creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrip {
    pub title: String,
    pub start_date: Date,
    pub end_date: Date,
    /// Defaults to [`DEFAULT_CURRENCY`] when `None`.
    pub currency_code: Option<String>,
}

impl NewTrip {
    /// Enforce the date-ordering invariant before anything reaches the
    /// network. The backend enforces it again server-side.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.start_date > self.end_date {
            return Err(ApiError::Validation("end date is before start date".into()));
        }
        Ok(())
    }

    #[must_use]
    pub fn currency_code(&self) -> &str {
        self.currency_code
            .as_deref()
            .filter(|code| !code.is_empty())
            .unwrap_or(DEFAULT_CURRENCY)
    }
}

/// Backend operations the trip store reads and writes through.
#[async_trait]
pub trait TripApi: Send + Sync {
    /// Trips visible to the current user, newest update first, with
    /// activity counts.
    async fn list_trips(&self) -> Result<Vec<TripSummary>, ApiError>;

    /// Single trip by id. `NotFound` when absent.
    async fn trip_detail(&self, trip_id: Uuid) -> Result<Trip, ApiError>;

    /// Days of a trip ordered by `day_index` ascending, optionally capped
    /// to the first `limit` rows.
    async fn trip_days(&self, trip_id: Uuid, limit: Option<u32>) -> Result<Vec<TripDay>, ApiError>;

    /// Atomically create a trip and its full set of days spanning
    /// `start..=end`. Returns the new trip id.
    async fn create_trip_with_days(&self, new_trip: &NewTrip) -> Result<Uuid, ApiError>;
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

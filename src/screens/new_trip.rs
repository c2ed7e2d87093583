//! New trip — creation form with client-side validation.

use time::Date;
use uuid::Uuid;

use crate::backend::NewTrip;
use crate::error::ApiError;
use crate::trips::TripStore;

/// Form state for the trip creation screen.
#[derive(Debug, Clone, Default)]
pub struct NewTripForm {
    pub title: String,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    /// Empty means the backend default currency.
    pub currency_code: String,
}

impl NewTripForm {
    /// Check the form's invariants and build the creation input. Nothing
    /// reaches the network until this passes.
    pub fn validate(&self) -> Result<NewTrip, ApiError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ApiError::Validation("title is required".into()));
        }
        let Some(start_date) = self.start_date else {
            return Err(ApiError::Validation("start date is required".into()));
        };
        let Some(end_date) = self.end_date else {
            return Err(ApiError::Validation("end date is required".into()));
        };

        let currency_code = {
            let code = self.currency_code.trim();
            (!code.is_empty()).then(|| code.to_owned())
        };
        let new_trip = NewTrip { title: title.to_owned(), start_date, end_date, currency_code };
        new_trip.validate()?;
        Ok(new_trip)
    }

    /// Validate and submit. Returns the created trip's id; the store
    /// invalidates the trips list on success.
    pub async fn submit(&self, store: &TripStore) -> Result<Uuid, ApiError> {
        let new_trip = self.validate()?;
        store.create_trip(&new_trip).await
    }
}

#[cfg(test)]
#[path = "new_trip_test.rs"]
mod tests;

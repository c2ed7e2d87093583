//! Screens — view-state builders composed from the stores.
//!
//! ARCHITECTURE
//! ============
//! Each screen produces a plain struct the host renders however it likes;
//! markup is out of scope here. Screens surface query errors inline, with
//! one exception: an authorization-denied error is not displayed but
//! converted into a sign-in redirect via [`redirect_for_error`], feeding
//! the same navigation effect the route guard uses.

pub mod auth_screen;
pub mod callback;
pub mod home;
pub mod itinerary;
pub mod new_trip;
pub mod trip_detail;

pub use auth_screen::begin_sign_in;
pub use callback::{CallbackOutcome, complete_sign_in};
pub use home::HomeView;
pub use itinerary::ItineraryView;
pub use new_trip::NewTripForm;
pub use trip_detail::TripDetailView;

use crate::error::ApiError;
use crate::guard::paths;

/// Redirect target for a query failure, if the failure demands one.
/// Authorization denials route to sign-in; every other error is the
/// screen's to display.
#[must_use]
pub fn redirect_for_error(error: Option<&ApiError>) -> Option<&'static str> {
    match error {
        Some(ApiError::Unauthorized) => Some(paths::SIGN_IN),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_redirects_to_sign_in() {
        assert_eq!(redirect_for_error(Some(&ApiError::Unauthorized)), Some("/auth"));
    }

    #[test]
    fn other_errors_stay_inline() {
        assert_eq!(redirect_for_error(Some(&ApiError::Network("down".into()))), None);
        assert_eq!(redirect_for_error(Some(&ApiError::NotFound)), None);
        assert_eq!(redirect_for_error(None), None);
    }
}

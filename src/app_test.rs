use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use time::macros::date;
use uuid::Uuid;

use super::*;
use crate::auth::{AuthUser, CallbackParams, Session};
use crate::backend::{NewTrip, Trip, TripDay, TripSummary};
use crate::error::ApiError;
use crate::guard::GuardState;
use crate::guard::paths;
use crate::router::Route;
use crate::screens;

struct StubIdentityApi;

#[async_trait]
impl IdentityApi for StubIdentityApi {
    fn authorize_url(&self, provider: &str, state: &str) -> String {
        format!("https://id.example.com/authorize?provider={provider}&state={state}")
    }

    async fn exchange_code(&self, code: &str) -> Result<Session, ApiError> {
        Ok(Session {
            access_token: format!("at-{code}"),
            refresh_token: "rt".into(),
            expires_at: OffsetDateTime::now_utc() + time::Duration::hours(1),
            user: AuthUser { id: Uuid::new_v4(), name: Some("Ana".into()), email: None },
        })
    }

    async fn refresh_session(&self, _refresh_token: &str) -> Result<Session, ApiError> {
        self.exchange_code("restored").await
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), ApiError> {
        Ok(())
    }
}

struct EmptyTripApi;

#[async_trait]
impl TripApi for EmptyTripApi {
    async fn list_trips(&self) -> Result<Vec<TripSummary>, ApiError> {
        Ok(Vec::new())
    }
    async fn trip_detail(&self, _trip_id: Uuid) -> Result<Trip, ApiError> {
        Err(ApiError::NotFound)
    }
    async fn trip_days(&self, _trip_id: Uuid, _limit: Option<u32>) -> Result<Vec<TripDay>, ApiError> {
        Ok(Vec::new())
    }
    async fn create_trip_with_days(&self, new_trip: &NewTrip) -> Result<Uuid, ApiError> {
        new_trip.validate()?;
        Ok(Uuid::new_v4())
    }
}

#[derive(Default)]
struct RecordingNavigator {
    replaced: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn replace(&self, path: &str) {
        self.replaced.lock().unwrap().push(path.to_owned());
    }
}

fn test_app() -> App {
    App::with_apis(Arc::new(StubIdentityApi), Arc::new(EmptyTripApi))
}

// =============================================================================
// navigation and guarding
// =============================================================================

#[tokio::test]
async fn navigation_before_start_pends_without_redirecting() {
    let app = test_app();
    let nav = RecordingNavigator::default();

    let resolution = app.navigate("/", &nav);
    assert_eq!(resolution.guard, GuardState::Pending);
    assert!(nav.replaced.lock().unwrap().is_empty());
}

#[tokio::test]
async fn signed_out_home_navigation_redirects_to_sign_in() {
    let app = test_app();
    app.start(None).await;
    let nav = RecordingNavigator::default();

    let resolution = app.navigate("/", &nav);
    assert_eq!(resolution.route, Route::Home);
    assert_eq!(resolution.guard, GuardState::Redirecting { target: paths::SIGN_IN });
    assert_eq!(*nav.replaced.lock().unwrap(), vec!["/auth".to_owned()]);
}

#[tokio::test]
async fn signed_in_auth_navigation_redirects_to_landing() {
    let app = test_app();
    app.start(Some("rt")).await;
    let nav = RecordingNavigator::default();

    let resolution = app.navigate("/auth", &nav);
    assert_eq!(resolution.guard, GuardState::Redirecting { target: paths::LANDING });
    assert_eq!(*nav.replaced.lock().unwrap(), vec!["/".to_owned()]);
}

#[tokio::test]
async fn signed_in_home_navigation_renders() {
    let app = test_app();
    app.start(Some("rt")).await;
    let nav = RecordingNavigator::default();

    let resolution = app.navigate("/", &nav);
    assert_eq!(resolution.guard, GuardState::Allowed);
    assert!(nav.replaced.lock().unwrap().is_empty());
}

// =============================================================================
// full sign-in round trip
// =============================================================================

#[tokio::test]
async fn sign_in_flow_flips_guard_decisions() {
    let app = test_app();
    app.start(None).await;
    let nav = RecordingNavigator::default();

    // Guest lands on /auth.
    assert_eq!(app.navigate("/auth", &nav).guard, GuardState::Allowed);

    // Begin and complete the OAuth flow.
    let url = screens::begin_sign_in(&app.gateway);
    let state = url.rsplit("state=").next().unwrap().to_owned();
    let outcome = screens::complete_sign_in(
        &app.gateway,
        &CallbackParams { code: "abc".into(), state: Some(state) },
    )
    .await;
    assert_eq!(outcome.redirect_to, paths::LANDING);

    // The session store observed the change; guards flip accordingly.
    assert!(app.session.snapshot().has_session());
    assert_eq!(app.navigate("/", &nav).guard, GuardState::Allowed);
    assert_eq!(app.navigate("/auth", &nav).guard, GuardState::Redirecting { target: paths::LANDING });

    // Sign out and the protected route locks again.
    app.gateway.sign_out().await.unwrap();
    assert_eq!(app.navigate("/", &nav).guard, GuardState::Redirecting { target: paths::SIGN_IN });
}

// =============================================================================
// screens over the app wiring
// =============================================================================

#[tokio::test]
async fn home_view_reports_empty_list() {
    let app = test_app();
    app.start(Some("rt")).await;

    let view = screens::HomeView::load(&app.trips).await;
    assert!(view.is_empty());
    assert!(view.redirect().is_none());
}

#[tokio::test]
async fn new_trip_submission_round_trips() {
    let app = test_app();
    app.start(Some("rt")).await;

    let form = screens::NewTripForm {
        title: "Kyoto Trip".into(),
        start_date: Some(date!(2025 - 11 - 02)),
        end_date: Some(date!(2025 - 11 - 10)),
        currency_code: String::new(),
    };
    assert!(form.submit(&app.trips).await.is_ok());
}

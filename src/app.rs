//! Application root — wires config, gateway, stores, and navigation.
//!
//! The root owns every process-wide component: the session store's
//! lifecycle (and therefore its gateway subscription) ends when the `App`
//! is dropped.

use std::sync::Arc;

use crate::auth::{AuthGateway, HttpIdentityApi, IdentityApi};
use crate::backend::{RestTripApi, TripApi};
use crate::config::BackendConfig;
use crate::guard::{self, Navigator};
use crate::router::{self, Resolution};
use crate::session::SessionStore;
use crate::trips::TripStore;

/// Assembled application core.
#[derive(Clone)]
pub struct App {
    pub gateway: AuthGateway,
    pub session: SessionStore,
    pub trips: TripStore,
}

impl App {
    /// Production wiring: HTTP identity and backend clients from config.
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        let identity: Arc<dyn IdentityApi> = Arc::new(HttpIdentityApi::new(config.clone()));
        let gateway = AuthGateway::new(identity);
        let trip_api: Arc<dyn TripApi> = Arc::new(RestTripApi::new(config, gateway.clone()));
        Self::assemble(gateway, trip_api)
    }

    /// Wiring seam for tests and alternative transports.
    #[must_use]
    pub fn with_apis(identity: Arc<dyn IdentityApi>, trip_api: Arc<dyn TripApi>) -> Self {
        Self::assemble(AuthGateway::new(identity), trip_api)
    }

    fn assemble(gateway: AuthGateway, trip_api: Arc<dyn TripApi>) -> Self {
        Self { gateway, session: SessionStore::new(), trips: TripStore::new(trip_api) }
    }

    /// Resolve the initial session. Until this returns, guards report
    /// `Pending` for every non-public route.
    pub async fn start(&self, stored_refresh_token: Option<&str>) {
        self.session.initialize(&self.gateway, stored_refresh_token).await;
    }

    /// Navigate to `path`: parse, guard against the current session
    /// snapshot, and execute any redirect through `navigator`.
    pub fn navigate(&self, path: &str, navigator: &dyn Navigator) -> Resolution {
        let resolution = router::resolve(path, &self.session.snapshot());
        guard::run(&resolution.guard, navigator);
        resolution
    }
}

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;

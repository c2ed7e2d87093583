//! Client core for a mobile trip-planning application.
//!
//! ARCHITECTURE
//! ============
//! The crate is the behavioral half of a trip-planning SPA: session state,
//! route guarding, and data synchronization against a hosted backend.
//! Rendering is the host's concern; screens here produce plain view-state.
//!
//! Control flow: [`router`] maps a path to a screen and wraps it in a
//! [`guard`] decision; the guard consults the [`session`] store (populated
//! by the [`auth`] gateway); once allowed, screens read through the
//! [`trips`] store, which caches backend reads in [`cache`] with a
//! staleness window, request deduplication, and retry.

pub mod app;
pub mod auth;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod guard;
pub mod router;
pub mod screens;
pub mod session;
pub mod trips;

pub use app::App;
pub use config::BackendConfig;
pub use error::ApiError;

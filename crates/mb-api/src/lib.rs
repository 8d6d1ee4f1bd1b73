//! # mb-api
//!
//! The web routing and orchestration layer for mongobnb.

pub mod error;
pub mod handlers;
pub mod middleware;

use axum::routing::{get, post};
use axum::Router;

pub use handlers::{AppState, SharedState};

/// Builds the application router.
///
/// `inbound_sms` mounts `POST /webhooks/sms`; without it cancellation by text
/// message is left entirely to external automation.
pub fn configure_routes(state: SharedState, inbound_sms: bool) -> Router {
    let mut routes = Router::new()
        .route("/", get(handlers::home))
        .route("/listing/{id}", get(handlers::listing))
        .route("/confirmation/{id}", get(handlers::confirmation));

    if inbound_sms {
        routes = routes.route("/webhooks/sms", post(handlers::inbound_sms));
    }

    middleware::standard_middleware(routes.fallback(handlers::fallback).with_state(state))
}

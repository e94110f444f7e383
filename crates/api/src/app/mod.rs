//! HTTP application wiring (axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: store wiring + the mutate-then-audit hand-off
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent `{success, message?, data?}` envelopes

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod extract;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(jwt_secret: String) -> Router {
    build_app_with(Arc::new(services::build_services(jwt_secret)))
}

/// Build the router around pre-wired services (tests reach the stores
/// through the same handle the handlers use).
pub fn build_app_with(services: Arc<services::AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        sessions: services.sessions.clone(),
        accounts: services.accounts.clone(),
    };

    // Protected routes: bearer token + account re-resolution.
    let protected = routes::protected_router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::public_router())
        .merge(protected)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}

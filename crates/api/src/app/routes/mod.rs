use axum::Router;

pub mod auth;
pub mod books;
pub mod logs;
pub mod system;

/// Router for all authenticated (account-scoped) endpoints.
pub fn protected_router() -> Router {
    Router::new()
        .nest("/auth", auth::protected_router())
        .nest("/books", books::router())
        .nest("/logs", logs::router())
}

/// Router for endpoints reachable without a session.
pub fn public_router() -> Router {
    Router::new().nest("/auth", auth::public_router())
}

//! Request authorization gate.
//!
//! Per request: bearer token present → signature/expiry valid → account
//! still resolvable → scoping identity attached. Any failed step
//! short-circuits with a 401 before the handler runs.

use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use shelfmark_auth::{CredentialStore, SessionIssuer};

use crate::app::errors;
use crate::context::AccountContext;

#[derive(Clone)]
pub struct AuthState {
    pub sessions: Arc<SessionIssuer>,
    pub accounts: Arc<dyn CredentialStore>,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer(req.headers()) {
        Some(t) => t,
        None => return errors::unauthorized("not authorized"),
    };

    let account_id = match state.sessions.verify(token) {
        Ok(id) => id,
        Err(_) => return errors::unauthorized("invalid or expired"),
    };

    // Stateless verification is not enough: the account may have vanished
    // after the token was issued.
    let account = match state.accounts.find(account_id) {
        Some(a) => a,
        None => return errors::unauthorized("user not found"),
    };

    req.extensions_mut().insert(AccountContext::new(account.id));
    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();

    if token.is_empty() { None } else { Some(token) }
}

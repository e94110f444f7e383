//! Consistent response envelopes.
//!
//! Every response body is `{"success": bool, "message"?, "data"?}`.
//! Infrastructure faults surface as a generic 500; internals go to the log,
//! not the client.

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use shelfmark_auth::{AuthError, Theme};
use shelfmark_core::DomainError;

pub fn json_data(status: StatusCode, data: serde_json::Value) -> axum::response::Response {
    (status, Json(json!({ "success": true, "data": data }))).into_response()
}

pub fn json_message(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        Json(json!({ "success": true, "message": message.into() })),
    )
        .into_response()
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        Json(json!({ "success": false, "message": message.into() })),
    )
        .into_response()
}

pub fn unauthorized(message: &'static str) -> axum::response::Response {
    json_error(StatusCode::UNAUTHORIZED, message)
}

/// Map a catalog-layer error onto the wire.
///
/// NotFound covers both "absent" and "not yours"; the distinction must not
/// be observable.
pub fn domain_error_to_response(err: &DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, msg.clone()),
        DomainError::InvalidId(_) => json_error(StatusCode::BAD_REQUEST, "invalid identifier"),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::BAD_REQUEST, msg.clone()),
    }
}

pub fn auth_error_to_response(err: &AuthError) -> axum::response::Response {
    match err {
        AuthError::DuplicateEmail => json_error(StatusCode::BAD_REQUEST, err.to_string()),
        AuthError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, msg.clone()),
        AuthError::InvalidCredentials => unauthorized("invalid credentials"),
        AuthError::InvalidOrExpiredToken => json_error(StatusCode::BAD_REQUEST, err.to_string()),
        AuthError::NotFound => json_error(StatusCode::NOT_FOUND, "account not found"),
        AuthError::Hashing(msg) => {
            tracing::error!("hashing backend failure: {msg}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}

pub fn parse_theme(s: &str) -> Result<Theme, axum::response::Response> {
    match s.to_lowercase().as_str() {
        "dark" => Ok(Theme::Dark),
        "light" => Ok(Theme::Light),
        _ => Err(json_error(
            StatusCode::BAD_REQUEST,
            "theme must be one of: dark, light",
        )),
    }
}

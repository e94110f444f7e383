use std::sync::Arc;

use axum::{
    Router,
    extract::{Extension, Path},
    http::StatusCode,
    routing::{get, post, put},
};

use shelfmark_auth::CredentialStore;

use crate::app::extract::Json;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::AccountContext;

/// Public endpoints: no bearer token.
pub fn public_router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password/:token", post(reset_password))
}

/// Endpoints behind the authorization gate.
pub fn protected_router() -> Router {
    Router::new()
        .route("/me", get(me))
        .route("/theme", put(set_theme))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterRequest>,
) -> axum::response::Response {
    let account = match services
        .accounts
        .register(&body.name, &body.email, &body.password)
    {
        Ok(a) => a,
        Err(e) => return errors::auth_error_to_response(&e),
    };

    let token = match services.sessions.issue(account.id) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("session issue failed: {e}");
            return errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal error");
        }
    };

    errors::json_data(
        StatusCode::CREATED,
        serde_json::json!({
            "token": token,
            "user": dto::user_to_json(&account),
        }),
    )
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let account = match services.accounts.verify(&body.email, &body.password) {
        Ok(a) => a,
        Err(e) => return errors::auth_error_to_response(&e),
    };

    let token = match services.sessions.issue(account.id) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("session issue failed: {e}");
            return errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal error");
        }
    };

    errors::json_data(
        StatusCode::OK,
        serde_json::json!({
            "token": token,
            "user": dto::user_to_json(&account),
        }),
    )
}

pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AccountContext>,
) -> axum::response::Response {
    match services.accounts.find(ctx.account_id()) {
        Some(account) => errors::json_data(
            StatusCode::OK,
            serde_json::json!({ "user": dto::user_to_json(&account) }),
        ),
        None => errors::unauthorized("user not found"),
    }
}

pub async fn set_theme(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AccountContext>,
    Json(body): Json<dto::ThemeRequest>,
) -> axum::response::Response {
    let theme = match errors::parse_theme(&body.theme) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    match services.accounts.set_theme(ctx.account_id(), theme) {
        Ok(account) => errors::json_data(
            StatusCode::OK,
            serde_json::json!({ "theme": account.theme.as_str() }),
        ),
        Err(e) => errors::auth_error_to_response(&e),
    }
}

pub async fn forgot_password(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ForgotPasswordRequest>,
) -> axum::response::Response {
    match services.accounts.issue_reset_token(&body.email) {
        // The raw token goes out through the mail collaborator, never the
        // response body.
        Ok(_raw_token) => errors::json_message(
            StatusCode::OK,
            "a password reset link has been sent to your email",
        ),
        Err(e) => errors::auth_error_to_response(&e),
    }
}

pub async fn reset_password(
    Extension(services): Extension<Arc<AppServices>>,
    Path(token): Path<String>,
    Json(body): Json<dto::ResetPasswordRequest>,
) -> axum::response::Response {
    match services.accounts.consume_reset_token(&token, &body.password) {
        Ok(_) => errors::json_message(StatusCode::OK, "password has been reset"),
        Err(e) => errors::auth_error_to_response(&e),
    }
}

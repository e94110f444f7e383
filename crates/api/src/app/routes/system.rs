use axum::http::StatusCode;

use crate::app::errors;

pub async fn health() -> axum::response::Response {
    errors::json_data(StatusCode::OK, serde_json::json!({ "status": "ok" }))
}

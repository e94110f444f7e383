use std::sync::Arc;

use axum::{
    Router,
    extract::{Extension, Query},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::AccountContext;

pub fn router() -> Router {
    Router::new().route("/", get(history).delete(clear))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    limit: Option<usize>,
}

pub async fn history(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AccountContext>,
    Query(query): Query<HistoryQuery>,
) -> axum::response::Response {
    let entries = services
        .history(ctx.account_id(), query.limit)
        .iter()
        .map(dto::log_entry_to_json)
        .collect::<Vec<_>>();
    errors::json_data(StatusCode::OK, serde_json::Value::Array(entries))
}

pub async fn clear(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AccountContext>,
) -> axum::response::Response {
    services.clear_history(ctx.account_id());
    errors::json_message(StatusCode::OK, "activity log cleared")
}

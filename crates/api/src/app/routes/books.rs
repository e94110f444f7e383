use std::sync::Arc;

use axum::{
    Router,
    extract::{Extension, Path},
    http::StatusCode,
    routing::get,
};

use shelfmark_catalog::{BookDraft, BookPatch};
use shelfmark_core::BookId;

use crate::app::extract::Json;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::AccountContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/:id", get(get_book).put(update_book).delete(delete_book))
}

pub async fn get_book(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AccountContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: BookId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid book id"),
    };

    match services.get_book(ctx.account_id(), id) {
        Ok(book) => errors::json_data(StatusCode::OK, dto::book_to_json(&book)),
        Err(e) => errors::domain_error_to_response(&e),
    }
}

pub async fn list_books(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AccountContext>,
) -> axum::response::Response {
    let books = services
        .list_books(ctx.account_id())
        .iter()
        .map(dto::book_to_json)
        .collect::<Vec<_>>();
    errors::json_data(StatusCode::OK, serde_json::Value::Array(books))
}

pub async fn create_book(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AccountContext>,
    Json(draft): Json<BookDraft>,
) -> axum::response::Response {
    match services.create_book(ctx.account_id(), draft) {
        Ok(book) => errors::json_data(StatusCode::CREATED, dto::book_to_json(&book)),
        Err(e) => errors::domain_error_to_response(&e),
    }
}

pub async fn update_book(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AccountContext>,
    Path(id): Path<String>,
    Json(patch): Json<BookPatch>,
) -> axum::response::Response {
    let id: BookId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid book id"),
    };

    match services.update_book(ctx.account_id(), id, patch) {
        Ok(book) => errors::json_data(StatusCode::OK, dto::book_to_json(&book)),
        Err(e) => errors::domain_error_to_response(&e),
    }
}

pub async fn delete_book(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AccountContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: BookId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid book id"),
    };

    match services.delete_book(ctx.account_id(), id) {
        Ok(book) => errors::json_data(StatusCode::OK, dto::book_to_json(&book)),
        Err(e) => errors::domain_error_to_response(&e),
    }
}

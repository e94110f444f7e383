//! Request extractors.
//!
//! Axum's stock `Json` rejects bad bodies with a plain-text 422; handlers
//! use this wrapper instead so deserialization failures come back as a 400
//! in the same `{"success": false, "message": ...}` envelope as every
//! other client error.

use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use serde::de::DeserializeOwned;

use crate::app::errors;

pub struct Json<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = axum::response::Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(errors::json_error(
                StatusCode::BAD_REQUEST,
                rejection.body_text(),
            )),
        }
    }
}

//! Outcome → HTTP response translation.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use bookstore_infra::StoreError;

use crate::app::dto::ValidationErrors;

/// Fixed body for every 500; fault details only go to the log.
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong. Please contact the administrator";

/// Fault raised while handling a request; converted to `Outcome::Fault` at
/// the handler boundary.
#[derive(Debug, Error)]
pub enum HandlerFault {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Terminal result of a handler operation, independent of HTTP.
#[derive(Debug)]
pub enum Outcome<D> {
    /// Single entity read.
    Found(D),
    /// Collection read.
    Listed(Vec<D>),
    /// Entity created; `location` is the canonical URL of the new resource.
    Created { location: String, body: D },
    Updated,
    Deleted,
    NotFound,
    BadRequest(ValidationErrors),
    /// The store executed the call but reported failure.
    OperationFailed,
    /// An unexpected fault was caught at the handler boundary.
    Fault,
}

impl<D> Outcome<D> {
    pub fn status(&self) -> StatusCode {
        match self {
            Outcome::Found(_) | Outcome::Listed(_) => StatusCode::OK,
            Outcome::Created { .. } => StatusCode::CREATED,
            Outcome::Updated | Outcome::Deleted => StatusCode::NO_CONTENT,
            Outcome::NotFound => StatusCode::NOT_FOUND,
            Outcome::BadRequest(_) => StatusCode::BAD_REQUEST,
            Outcome::OperationFailed | Outcome::Fault => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl<D: Serialize> IntoResponse for Outcome<D> {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Outcome::Found(body) => (status, Json(body)).into_response(),
            Outcome::Listed(items) => (status, Json(items)).into_response(),
            Outcome::Created { location, body } => match HeaderValue::from_str(&location) {
                Ok(location) => (status, [(header::LOCATION, location)], Json(body)).into_response(),
                Err(_) => (status, Json(body)).into_response(),
            },
            Outcome::Updated | Outcome::Deleted | Outcome::NotFound => status.into_response(),
            Outcome::BadRequest(errors) => (
                status,
                Json(json!({
                    "error": "validation_error",
                    "message": errors.message(),
                    "errors": errors.errors(),
                })),
            )
                .into_response(),
            Outcome::OperationFailed | Outcome::Fault => internal_error(),
        }
    }
}

pub fn internal_error() -> Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        INTERNAL_ERROR_MESSAGE,
    )
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

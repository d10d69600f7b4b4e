//! CRUD routes shared by every resource; each handler delegates to the
//! resource's `ResourceHandler` and renders its `Outcome`.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::app::dto::ValidationErrors;
use crate::app::handler::Resource;
use crate::app::services::AppServices;

pub fn router<R: Resource>() -> Router {
    Router::new()
        .route("/", get(list::<R>).post(create::<R>))
        .route("/:id", get(get_one::<R>).put(update::<R>).delete(delete::<R>))
}

pub async fn list<R: Resource>(Extension(services): Extension<Arc<AppServices>>) -> Response {
    R::handler(&services).find_all().await.into_response()
}

pub async fn get_one<R: Resource>(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    R::handler(&services).find_by_id(&id).await.into_response()
}

pub async fn create<R: Resource>(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<R::CreateDto>, JsonRejection>,
) -> Response {
    R::handler(&services)
        .create(request_body(payload))
        .await
        .into_response()
}

pub async fn update<R: Resource>(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    payload: Result<Json<R::UpdateDto>, JsonRejection>,
) -> Response {
    R::handler(&services)
        .update(&id, request_body(payload))
        .await
        .into_response()
}

pub async fn delete<R: Resource>(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    R::handler(&services).delete(&id).await.into_response()
}

/// Absent or undecodable bodies become a validation failure on `body`.
fn request_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ValidationErrors> {
    payload.map(|Json(dto)| dto).map_err(|rejection| {
        ValidationErrors::field(
            "Empty or malformed request was submitted",
            "body",
            rejection.body_text(),
        )
    })
}

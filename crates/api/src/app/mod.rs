//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store and handler wiring
//! - `handler.rs`: the generic request pipeline every resource runs through
//! - `routes/`: HTTP routes (one file per resource)
//! - `dto.rs`: request/response DTOs and validation
//! - `errors.rs`: outcome → response translation

use std::sync::Arc;

use axum::response::Response;
use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod errors;
pub mod handler;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(panic_response)),
        )
}

/// A panicking handler still answers with the fixed 500 body.
fn panic_response(_panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    tracing::error!("handler panicked");
    errors::internal_error()
}

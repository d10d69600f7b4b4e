use axum::Router;

use bookstore_core::{Author, Book};

use crate::app::handler::Resource;

pub mod authors;
pub mod books;
pub mod resource;
pub mod system;

/// Router for all entity endpoints (`/api/{entity}`).
pub fn router() -> Router {
    Router::new()
        .nest(&collection_path::<Author>(), authors::router())
        .nest(&collection_path::<Book>(), books::router())
}

fn collection_path<R: Resource>() -> String {
    format!("/api/{}", R::PATH)
}

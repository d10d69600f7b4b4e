use axum::Router;

use bookstore_core::Book;

use crate::app::dto::{BookCreateDto, BookDto, BookUpdateDto};
use crate::app::handler::{Resource, ResourceHandler};
use crate::app::routes::resource;
use crate::app::services::AppServices;

impl Resource for Book {
    const PATH: &'static str = "books";

    type CreateDto = BookCreateDto;
    type UpdateDto = BookUpdateDto;
    type ReadDto = BookDto;

    fn update_id(dto: &BookUpdateDto) -> i32 {
        dto.id
    }

    fn handler(services: &AppServices) -> &ResourceHandler<Self> {
        &services.books
    }
}

pub fn router() -> Router {
    resource::router::<Book>()
}

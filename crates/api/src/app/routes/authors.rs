use axum::Router;

use bookstore_core::Author;

use crate::app::dto::{AuthorCreateDto, AuthorDto, AuthorUpdateDto};
use crate::app::handler::{Resource, ResourceHandler};
use crate::app::routes::resource;
use crate::app::services::AppServices;

impl Resource for Author {
    const PATH: &'static str = "authors";

    type CreateDto = AuthorCreateDto;
    type UpdateDto = AuthorUpdateDto;
    type ReadDto = AuthorDto;

    fn update_id(dto: &AuthorUpdateDto) -> i32 {
        dto.id
    }

    fn handler(services: &AppServices) -> &ResourceHandler<Self> {
        &services.authors
    }
}

pub fn router() -> Router {
    resource::router::<Author>()
}

//! Entity <-> DTO translation.
//!
//! Each (source, target) pair has an explicit `From` impl. Create DTOs map to
//! entities with an unassigned identity; update DTOs carry their identity over.
//! Field presence is checked by `Validate` before any of these run, so absent
//! required fields fall back to empty values here.

use bookstore_core::{Author, Book, EntityId};

use crate::app::dto::{
    AuthorCreateDto, AuthorDto, AuthorUpdateDto, BookCreateDto, BookDto, BookUpdateDto,
};

/// Map a slice, preserving order.
pub fn map_all<'a, S, D>(items: &'a [S]) -> Vec<D>
where
    D: From<&'a S>,
{
    items.iter().map(D::from).collect()
}

impl From<&Author> for AuthorDto {
    fn from(a: &Author) -> Self {
        Self {
            id: a.id.get(),
            first_name: a.firstname.clone(),
            last_name: a.lastname.clone(),
            bio: a.bio.clone(),
        }
    }
}

impl From<AuthorCreateDto> for Author {
    fn from(dto: AuthorCreateDto) -> Self {
        Author::new(
            dto.first_name.unwrap_or_default(),
            dto.last_name.unwrap_or_default(),
            dto.bio,
        )
    }
}

impl From<AuthorUpdateDto> for Author {
    fn from(dto: AuthorUpdateDto) -> Self {
        Author {
            id: EntityId::from_raw(dto.id),
            firstname: dto.first_name.unwrap_or_default(),
            lastname: dto.last_name.unwrap_or_default(),
            bio: dto.bio,
        }
    }
}

impl From<&Book> for BookDto {
    fn from(b: &Book) -> Self {
        Self {
            id: b.id.get(),
            title: b.title.clone(),
            year: b.year,
            isbn: b.isbn.clone(),
            summary: b.summary.clone(),
            image: b.image.clone(),
            price: b.price,
            author_id: b.author_id.get(),
        }
    }
}

impl From<BookCreateDto> for Book {
    fn from(dto: BookCreateDto) -> Self {
        Book {
            id: EntityId::UNASSIGNED,
            title: dto.title.unwrap_or_default(),
            year: dto.year,
            isbn: dto.isbn.unwrap_or_default(),
            summary: dto.summary,
            image: dto.image,
            price: dto.price,
            author_id: EntityId::from_raw(dto.author_id.unwrap_or_default()),
        }
    }
}

impl From<BookUpdateDto> for Book {
    fn from(dto: BookUpdateDto) -> Self {
        Book {
            id: EntityId::from_raw(dto.id),
            title: dto.title.unwrap_or_default(),
            year: dto.year,
            isbn: dto.isbn.unwrap_or_default(),
            summary: dto.summary,
            image: dto.image,
            price: dto.price,
            author_id: EntityId::from_raw(dto.author_id.unwrap_or_default()),
        }
    }
}

//! In-memory bookstore catalog with the relational rules of the SQL schema.
//!
//! Authors and books live in two `InMemoryEntityStore`s. Writes additionally
//! enforce what the `authors`/`books` tables enforce in Postgres:
//!
//! - a book's `author_id` must reference an existing author;
//! - `isbn` is unique across books;
//! - an author cannot be deleted while books still reference it.
//!
//! A violated rule is a rejected write (`Ok(false)`), same as a constraint
//! violation on Postgres. Every mutating call runs its checks and its write
//! under one catalog-wide lock, so two writers cannot both pass a check.

use std::sync::{Mutex, MutexGuard};

use bookstore_core::{Author, Book, Entity, EntityId};

use super::{EntityStore, InMemoryEntityStore, StoreError, StoreResult};

#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    authors: InMemoryEntityStore<Author>,
    books: InMemoryEntityStore<Book>,
    writes: Mutex<()>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn write_lock(&self) -> StoreResult<MutexGuard<'_, ()>> {
        self.writes
            .lock()
            .map_err(|_| StoreError::Unavailable("catalog lock poisoned".to_string()))
    }

    /// Foreign key and unique-isbn checks for a book about to be written.
    fn book_violation(&self, book: &Book) -> StoreResult<Option<&'static str>> {
        if !self.authors.contains(book.author_id)? {
            return Ok(Some("books.author_id references a missing author"));
        }
        let duplicate = self
            .books
            .any(|other| other.isbn == book.isbn && other.id != book.id)?;
        if duplicate {
            return Ok(Some("books.isbn must be unique"));
        }
        Ok(None)
    }
}

fn rejected(entity: &'static str, id: EntityId, rule: &str) -> StoreResult<bool> {
    tracing::warn!(entity, %id, rule, "write rejected by catalog constraint");
    Ok(false)
}

#[async_trait::async_trait]
impl EntityStore<Author> for InMemoryCatalog {
    async fn find_all(&self) -> StoreResult<Vec<Author>> {
        self.authors.rows()
    }

    async fn find_by_id(&self, id: EntityId) -> StoreResult<Option<Author>> {
        self.authors.row(id)
    }

    async fn exists(&self, id: EntityId) -> StoreResult<bool> {
        self.authors.contains(id)
    }

    async fn create(&self, entity: &mut Author) -> StoreResult<bool> {
        let _writes = self.write_lock()?;
        self.authors.insert(entity)
    }

    async fn update(&self, entity: &Author) -> StoreResult<bool> {
        let _writes = self.write_lock()?;
        self.authors.replace(entity)
    }

    async fn delete(&self, entity: Author) -> StoreResult<bool> {
        let _writes = self.write_lock()?;
        let id = entity.id();
        if self.books.any(|book| book.author_id == id)? {
            return rejected(Author::NAME, id, "books.author_id still references this author");
        }
        self.authors.remove(&entity)
    }
}

#[async_trait::async_trait]
impl EntityStore<Book> for InMemoryCatalog {
    async fn find_all(&self) -> StoreResult<Vec<Book>> {
        self.books.rows()
    }

    async fn find_by_id(&self, id: EntityId) -> StoreResult<Option<Book>> {
        self.books.row(id)
    }

    async fn exists(&self, id: EntityId) -> StoreResult<bool> {
        self.books.contains(id)
    }

    async fn create(&self, entity: &mut Book) -> StoreResult<bool> {
        let _writes = self.write_lock()?;
        if let Some(rule) = self.book_violation(entity)? {
            return rejected(Book::NAME, entity.id(), rule);
        }
        self.books.insert(entity)
    }

    async fn update(&self, entity: &Book) -> StoreResult<bool> {
        let _writes = self.write_lock()?;
        if let Some(rule) = self.book_violation(entity)? {
            return rejected(Book::NAME, entity.id(), rule);
        }
        self.books.replace(entity)
    }

    async fn delete(&self, entity: Book) -> StoreResult<bool> {
        let _writes = self.write_lock()?;
        self.books.remove(&entity)
    }
}

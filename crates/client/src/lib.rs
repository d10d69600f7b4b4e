//! `bookstore-client`
//!
//! Client-side repositories for the bookstore API: every CRUD operation is
//! proxied over HTTP, successful reads are cached in local storage, and reads
//! fall back to that cache when the API cannot be reached. The API remains the
//! authority; writes are never served from the cache.

pub mod error;
pub mod models;
pub mod repository;
pub mod storage;

pub use error::ClientError;
pub use models::{ClientAuthor, ClientBook, ClientModel};
pub use repository::{AuthorRepo, BaseRepository, BookRepo, EntityRepo};
pub use storage::{InMemoryLocalStorage, LocalStorage, AUTH_TOKEN_KEY};

//! `bookstore-core`: domain building blocks for the bookstore.
//!
//! This crate contains **pure domain** types (no infrastructure concerns).

pub mod author;
pub mod book;
pub mod entity;
pub mod error;
pub mod id;

pub use author::Author;
pub use book::Book;
pub use entity::Entity;
pub use error::DomainError;
pub use id::EntityId;

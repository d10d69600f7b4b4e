//! Entity persistence boundary.
//!
//! `EntityStore<T>` is the single capability every request handler talks to.
//! "Not found" and "rejected" are ordinary return values (`None` / `false`);
//! `Err(StoreError)` is reserved for unexpected faults, which callers propagate
//! to their own error boundary.

use std::sync::Arc;

use bookstore_core::{Entity, EntityId};
use thiserror::Error;

pub mod catalog;
pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use catalog::InMemoryCatalog;
pub use in_memory::InMemoryEntityStore;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Unexpected persistence fault.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not serve the call (lock poisoned, pool closed, ...).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A persisted row could not be decoded into an entity.
    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[cfg(feature = "postgres")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Generic CRUD store over an entity type with integer identity.
#[async_trait::async_trait]
pub trait EntityStore<T>: Send + Sync
where
    T: Entity + Send + Sync + 'static,
{
    /// All entities, ordered by id. Never fails on an empty store.
    async fn find_all(&self) -> StoreResult<Vec<T>>;

    /// The entity with `id`, or `None` if there is none.
    async fn find_by_id(&self, id: EntityId) -> StoreResult<Option<T>>;

    async fn exists(&self, id: EntityId) -> StoreResult<bool>;

    /// Persist a new entity.
    ///
    /// On success the store-assigned identity is written into `entity` and
    /// `true` is returned. A rejected insert returns `false` and leaves the
    /// identity untouched.
    async fn create(&self, entity: &mut T) -> StoreResult<bool>;

    /// Replace the fields of the stored entity with the same id.
    ///
    /// `false` means no row changed.
    async fn update(&self, entity: &T) -> StoreResult<bool>;

    /// Remove a previously retrieved entity.
    async fn delete(&self, entity: T) -> StoreResult<bool>;
}

#[async_trait::async_trait]
impl<T, S> EntityStore<T> for Arc<S>
where
    T: Entity + Send + Sync + 'static,
    S: EntityStore<T> + ?Sized,
{
    async fn find_all(&self) -> StoreResult<Vec<T>> {
        (**self).find_all().await
    }

    async fn find_by_id(&self, id: EntityId) -> StoreResult<Option<T>> {
        (**self).find_by_id(id).await
    }

    async fn exists(&self, id: EntityId) -> StoreResult<bool> {
        (**self).exists(id).await
    }

    async fn create(&self, entity: &mut T) -> StoreResult<bool> {
        (**self).create(entity).await
    }

    async fn update(&self, entity: &T) -> StoreResult<bool> {
        (**self).update(entity).await
    }

    async fn delete(&self, entity: T) -> StoreResult<bool> {
        (**self).delete(entity).await
    }
}

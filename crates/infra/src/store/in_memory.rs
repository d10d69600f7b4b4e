use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use bookstore_core::{Entity, EntityId};

use super::{EntityStore, StoreError, StoreResult};

#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<EntityId, T>,
    last_id: i32,
}

/// In-memory entity store.
///
/// Intended for tests/dev. Identities are assigned from a per-store sequence
/// starting at 1 and are never reused, even after deletes.
#[derive(Debug)]
pub struct InMemoryEntityStore<T> {
    table: RwLock<Table<T>>,
}

impl<T> InMemoryEntityStore<T> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                rows: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Table<T>>> {
        self.table
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Table<T>>> {
        self.table
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }
}

impl<T> Default for InMemoryEntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> InMemoryEntityStore<T>
where
    T: Entity + Clone,
{
    pub(crate) fn rows(&self) -> StoreResult<Vec<T>> {
        Ok(self.read()?.rows.values().cloned().collect())
    }

    pub(crate) fn row(&self, id: EntityId) -> StoreResult<Option<T>> {
        Ok(self.read()?.rows.get(&id).cloned())
    }

    pub(crate) fn contains(&self, id: EntityId) -> StoreResult<bool> {
        Ok(self.read()?.rows.contains_key(&id))
    }

    /// Whether any stored row satisfies `pred`.
    pub(crate) fn any(&self, pred: impl Fn(&T) -> bool) -> StoreResult<bool> {
        Ok(self.read()?.rows.values().any(pred))
    }

    pub(crate) fn insert(&self, entity: &mut T) -> StoreResult<bool> {
        let mut table = self.write()?;
        let Some(next) = table.last_id.checked_add(1) else {
            tracing::warn!(entity = T::NAME, "id sequence exhausted");
            return Ok(false);
        };
        table.last_id = next;

        let id = EntityId::from_raw(next);
        let mut row = entity.clone();
        row.assign_id(id);
        table.rows.insert(id, row);

        entity.assign_id(id);
        Ok(true)
    }

    pub(crate) fn replace(&self, entity: &T) -> StoreResult<bool> {
        let mut table = self.write()?;
        match table.rows.get_mut(&entity.id()) {
            Some(row) => {
                *row = entity.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub(crate) fn remove(&self, entity: &T) -> StoreResult<bool> {
        Ok(self.write()?.rows.remove(&entity.id()).is_some())
    }
}

#[async_trait::async_trait]
impl<T> EntityStore<T> for InMemoryEntityStore<T>
where
    T: Entity + Clone + Send + Sync + 'static,
{
    async fn find_all(&self) -> StoreResult<Vec<T>> {
        self.rows()
    }

    async fn find_by_id(&self, id: EntityId) -> StoreResult<Option<T>> {
        self.row(id)
    }

    async fn exists(&self, id: EntityId) -> StoreResult<bool> {
        self.contains(id)
    }

    async fn create(&self, entity: &mut T) -> StoreResult<bool> {
        self.insert(entity)
    }

    async fn update(&self, entity: &T) -> StoreResult<bool> {
        self.replace(entity)
    }

    async fn delete(&self, entity: T) -> StoreResult<bool> {
        self.remove(&entity)
    }
}

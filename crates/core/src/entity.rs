//! Entity trait: identity + continuity across state changes.

use crate::id::EntityId;

/// Persisted entity with a store-assigned integer identity.
pub trait Entity {
    /// Human-readable name used in log messages ("Author", "Book").
    const NAME: &'static str;

    /// Returns the entity identifier (`EntityId::UNASSIGNED` before creation).
    fn id(&self) -> EntityId;

    /// Record the identity assigned by the store on a successful create.
    fn assign_id(&mut self, id: EntityId);
}

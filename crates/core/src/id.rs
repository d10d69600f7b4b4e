//! Integer identity shared by every persisted entity.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a persisted entity.
///
/// Valid identities are strictly positive; `0` marks an entity the store has not
/// assigned an identity to yet.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(i32);

impl EntityId {
    pub const UNASSIGNED: EntityId = EntityId(0);

    /// Validated constructor: rejects ids `< 1`.
    pub fn new(raw: i32) -> Result<Self, DomainError> {
        if raw < 1 {
            return Err(DomainError::invalid_id(format!("id must be positive, got {raw}")));
        }
        Ok(Self(raw))
    }

    /// Wrap a raw value without validation (store rows, wire DTOs).
    pub fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub fn get(self) -> i32 {
        self.0
    }

    pub fn is_assigned(self) -> bool {
        self.0 > 0
    }
}

impl core::fmt::Display for EntityId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for EntityId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i32 = s
            .trim()
            .parse()
            .map_err(|e| DomainError::invalid_id(format!("{s:?}: {e}")))?;
        Self::new(raw)
    }
}

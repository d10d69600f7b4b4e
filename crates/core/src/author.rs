use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::id::EntityId;

/// Maximum length of an author biography.
pub const BIO_MAX_LEN: usize = 250;

/// Author of one or more books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: EntityId,
    pub firstname: String,
    pub lastname: String,
    pub bio: Option<String>,
}

impl Author {
    /// A not-yet-persisted author (identity unassigned).
    pub fn new(firstname: impl Into<String>, lastname: impl Into<String>, bio: Option<String>) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            firstname: firstname.into(),
            lastname: lastname.into(),
            bio,
        }
    }
}

impl Entity for Author {
    const NAME: &'static str = "Author";

    fn id(&self) -> EntityId {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = id;
    }
}

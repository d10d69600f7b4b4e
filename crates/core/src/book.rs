use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::id::EntityId;

/// Maximum length of a book title.
pub const TITLE_MAX_LEN: usize = 50;

/// Maximum length of a book summary.
pub const SUMMARY_MAX_LEN: usize = 500;

/// Book, owned by exactly one author (`author_id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: EntityId,
    pub title: String,
    pub year: Option<i32>,
    pub isbn: String,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub price: Option<f64>,
    pub author_id: EntityId,
}

impl Entity for Book {
    const NAME: &'static str = "Book";

    fn id(&self) -> EntityId {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = id;
    }
}

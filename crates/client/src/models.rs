//! Wire models as seen by API consumers.

use serde::{Deserialize, Serialize};

/// A model served under `/api/{PATH}`.
pub trait ClientModel {
    const PATH: &'static str;

    fn id(&self) -> i32;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientAuthor {
    #[serde(default)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub bio: Option<String>,
}

impl ClientModel for ClientAuthor {
    const PATH: &'static str = "authors";

    fn id(&self) -> i32 {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientBook {
    #[serde(default)]
    pub id: i32,
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    pub isbn: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    pub author_id: i32,
}

impl ClientModel for ClientBook {
    const PATH: &'static str = "books";

    fn id(&self) -> i32 {
        self.id
    }
}

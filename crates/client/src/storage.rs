//! Local key/value storage used for the auth token and cached reads.

use std::collections::HashMap;
use std::sync::RwLock;

/// Key holding the bearer token attached to every request.
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// String key/value storage local to the client (browser storage, a file, ...).
///
/// Storage is best-effort: implementations swallow their own failures, and a
/// failed write simply means the next read misses.
pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: String);
    fn remove_item(&self, key: &str);
}

#[derive(Debug, Default)]
pub struct InMemoryLocalStorage {
    items: RwLock<HashMap<String, String>>,
}

impl InMemoryLocalStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LocalStorage for InMemoryLocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.read().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: String) {
        if let Ok(mut items) = self.items.write() {
            items.insert(key.to_string(), value);
        }
    }

    fn remove_item(&self, key: &str) {
        if let Ok(mut items) = self.items.write() {
            items.remove(key);
        }
    }
}

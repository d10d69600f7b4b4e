//! HTTP-backed repositories with a local read cache.

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::models::{ClientAuthor, ClientBook, ClientModel};
use crate::storage::{LocalStorage, AUTH_TOKEN_KEY};

/// Cached response body, keyed in local storage by request URL.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    cached_at: DateTime<Utc>,
    data: serde_json::Value,
}

/// Generic CRUD client over one model type.
///
/// Status codes carry the result: `201`/`204` mean success, `200` carries a
/// body, anything else is "no" (`false` / `None`). Only transport failures and
/// undecodable bodies are errors.
pub struct BaseRepository<T> {
    client: reqwest::Client,
    storage: Arc<dyn LocalStorage>,
    max_age: Option<Duration>,
    _model: PhantomData<fn() -> T>,
}

impl<T> BaseRepository<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(client: reqwest::Client, storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            client,
            storage,
            max_age: None,
            _model: PhantomData,
        }
    }

    /// Ignore cache entries older than `max_age` when falling back.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub async fn create(&self, url: &str, obj: &T) -> Result<bool, ClientError> {
        let res = self
            .authorized(self.client.post(collection_url(url)))
            .json(obj)
            .send()
            .await?;

        let created = res.status() == StatusCode::CREATED;
        if created {
            self.invalidate(url, None);
        }
        Ok(created)
    }

    pub async fn get(&self, url: &str, id: i32) -> Result<Option<T>, ClientError> {
        if id < 1 {
            return Ok(None);
        }
        self.fetch(&item_url(url, id)).await
    }

    pub async fn get_all(&self, url: &str) -> Result<Option<Vec<T>>, ClientError> {
        self.fetch(collection_url(url)).await
    }

    pub async fn update(&self, url: &str, obj: &T, id: i32) -> Result<bool, ClientError> {
        if id < 1 {
            return Ok(false);
        }
        let res = self
            .authorized(self.client.put(item_url(url, id)))
            .json(obj)
            .send()
            .await?;

        let updated = res.status() == StatusCode::NO_CONTENT;
        if updated {
            self.invalidate(url, Some(id));
        }
        Ok(updated)
    }

    pub async fn delete(&self, url: &str, id: i32) -> Result<bool, ClientError> {
        if id < 1 {
            return Ok(false);
        }
        let res = self
            .authorized(self.client.delete(item_url(url, id)))
            .send()
            .await?;

        let deleted = res.status() == StatusCode::NO_CONTENT;
        if deleted {
            self.invalidate(url, Some(id));
        }
        Ok(deleted)
    }

    async fn fetch<R: DeserializeOwned>(&self, url: &str) -> Result<Option<R>, ClientError> {
        let res = match self.authorized(self.client.get(url)).send().await {
            Ok(res) => res,
            Err(err) => {
                return match self.cached(url) {
                    Some(hit) => {
                        tracing::warn!(url, error = %err, "API unreachable; serving cached value");
                        Ok(Some(hit))
                    }
                    None => Err(ClientError::Network(err)),
                };
            }
        };

        match res.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => {
                self.storage.remove_item(url);
                return Ok(None);
            }
            _ => return Ok(None),
        }

        let data: serde_json::Value = res
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;
        let value: R =
            serde_json::from_value(data.clone()).map_err(|e| ClientError::Parse(e.to_string()))?;

        let entry = CacheEntry {
            cached_at: Utc::now(),
            data,
        };
        if let Ok(raw) = serde_json::to_string(&entry) {
            self.storage.set_item(url, raw);
        }

        Ok(Some(value))
    }

    fn cached<R: DeserializeOwned>(&self, url: &str) -> Option<R> {
        let entry: CacheEntry = serde_json::from_str(&self.storage.get_item(url)?).ok()?;
        if let Some(max_age) = self.max_age {
            if Utc::now() - entry.cached_at > max_age {
                return None;
            }
        }
        serde_json::from_value(entry.data).ok()
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match self.storage.get_item(AUTH_TOKEN_KEY) {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    fn invalidate(&self, url: &str, id: Option<i32>) {
        self.storage.remove_item(collection_url(url));
        if let Some(id) = id {
            self.storage.remove_item(&item_url(url, id));
        }
    }
}

fn collection_url(url: &str) -> &str {
    url.trim_end_matches('/')
}

fn item_url(url: &str, id: i32) -> String {
    format!("{}/{}", collection_url(url), id)
}

/// Repository bound to one model's collection URL.
pub struct EntityRepo<T> {
    base: BaseRepository<T>,
    url: String,
}

pub type AuthorRepo = EntityRepo<ClientAuthor>;
pub type BookRepo = EntityRepo<ClientBook>;

impl<T> EntityRepo<T>
where
    T: ClientModel + Serialize + DeserializeOwned,
{
    /// `api_url` is the server root, e.g. `http://localhost:8080`.
    pub fn new(api_url: &str, client: reqwest::Client, storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            base: BaseRepository::new(client, storage),
            url: format!("{}/api/{}", api_url.trim_end_matches('/'), T::PATH),
        }
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.base = self.base.with_max_age(max_age);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn item_url(&self, id: i32) -> String {
        item_url(&self.url, id)
    }

    pub async fn create(&self, obj: &T) -> Result<bool, ClientError> {
        self.base.create(&self.url, obj).await
    }

    pub async fn get(&self, id: i32) -> Result<Option<T>, ClientError> {
        self.base.get(&self.url, id).await
    }

    pub async fn get_all(&self) -> Result<Option<Vec<T>>, ClientError> {
        self.base.get_all(&self.url).await
    }

    pub async fn update(&self, obj: &T) -> Result<bool, ClientError> {
        self.base.update(&self.url, obj, obj.id()).await
    }

    pub async fn delete(&self, id: i32) -> Result<bool, ClientError> {
        self.base.delete(&self.url, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_normalized() {
        assert_eq!(collection_url("http://h/api/authors/"), "http://h/api/authors");
        assert_eq!(item_url("http://h/api/authors/", 3), "http://h/api/authors/3");
        assert_eq!(item_url("http://h/api/authors", 3), "http://h/api/authors/3");
    }

    #[test]
    fn entity_repo_targets_model_path() {
        let storage = Arc::new(crate::storage::InMemoryLocalStorage::new());
        let repo = BookRepo::new("http://localhost:8080/", reqwest::Client::new(), storage);
        assert_eq!(repo.url(), "http://localhost:8080/api/books");
        assert_eq!(repo.item_url(9), "http://localhost:8080/api/books/9");
    }
}

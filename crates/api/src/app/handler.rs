//! Generic request pipeline shared by every entity endpoint.
//!
//! Each operation runs the same sequence: log the attempt, validate the path
//! id and payload, check existence (update/delete), call the store, map the
//! result to a DTO, log the terminal outcome. Store faults propagate with `?`
//! up to [`ResourceHandler::boundary`], the one place they become
//! `Outcome::Fault`.
//!
//! The existence check before update/delete is not atomic with the mutation:
//! a concurrent delete in between surfaces as "not found" (delete re-reads the
//! entity) or as "operation failed" (update sees no changed rows).

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use bookstore_core::{Entity, EntityId};
use bookstore_infra::EntityStore;
use bookstore_observability::OutcomeLog;

use crate::app::dto::{Validate, ValidationErrors};
use crate::app::errors::{HandlerFault, Outcome};
use crate::app::services::AppServices;
use crate::mapping;

/// An entity type exposed under `/api/{PATH}`.
pub trait Resource: Entity + Clone + Send + Sync + 'static {
    /// Collection path segment ("authors").
    const PATH: &'static str;

    type CreateDto: DeserializeOwned + Validate + Into<Self> + Send + 'static;
    type UpdateDto: DeserializeOwned + Validate + Into<Self> + Send + 'static;
    type ReadDto: Serialize + for<'a> From<&'a Self> + Send + 'static;

    /// Identity carried in an update body.
    fn update_id(dto: &Self::UpdateDto) -> i32;

    /// The handler serving this resource.
    fn handler(services: &AppServices) -> &ResourceHandler<Self>;
}

type HandlerResult<D> = Result<Outcome<D>, HandlerFault>;

/// Request handler for one resource type.
pub struct ResourceHandler<R: Resource> {
    store: Arc<dyn EntityStore<R>>,
    log: Arc<dyn OutcomeLog>,
}

impl<R: Resource> ResourceHandler<R> {
    pub fn new(store: Arc<dyn EntityStore<R>>, log: Arc<dyn OutcomeLog>) -> Self {
        Self { store, log }
    }

    pub async fn find_all(&self) -> Outcome<R::ReadDto> {
        self.boundary(self.try_find_all()).await
    }

    pub async fn find_by_id(&self, raw_id: &str) -> Outcome<R::ReadDto> {
        self.boundary(self.try_find_by_id(raw_id)).await
    }

    /// `payload` is `Err` when the body was absent or could not be decoded.
    pub async fn create(
        &self,
        payload: Result<R::CreateDto, ValidationErrors>,
    ) -> Outcome<R::ReadDto> {
        self.boundary(self.try_create(payload)).await
    }

    pub async fn update(
        &self,
        raw_id: &str,
        payload: Result<R::UpdateDto, ValidationErrors>,
    ) -> Outcome<R::ReadDto> {
        self.boundary(self.try_update(raw_id, payload)).await
    }

    pub async fn delete(&self, raw_id: &str) -> Outcome<R::ReadDto> {
        self.boundary(self.try_delete(raw_id)).await
    }

    /// Single error boundary: any propagated fault becomes a logged `Fault`.
    async fn boundary<F>(&self, op: F) -> Outcome<R::ReadDto>
    where
        F: Future<Output = HandlerResult<R::ReadDto>>,
    {
        match op.await {
            Ok(outcome) => outcome,
            Err(fault) => {
                self.log.error(&format!("{} request failed: {fault}", R::NAME));
                Outcome::Fault
            }
        }
    }

    async fn try_find_all(&self) -> HandlerResult<R::ReadDto> {
        self.log.info(&format!("Attempted get all {}s", R::NAME));

        let entities = self.store.find_all().await?;
        let items: Vec<R::ReadDto> = mapping::map_all(&entities);

        self.log.info(&format!("Successfully got all {}s", R::NAME));
        Ok(Outcome::Listed(items))
    }

    async fn try_find_by_id(&self, raw_id: &str) -> HandlerResult<R::ReadDto> {
        self.log.info(&format!("Attempted to get {} with id: {}", R::NAME, loggable_id(raw_id)));

        let id = match parse_id(raw_id) {
            Ok(id) => id,
            Err(errors) => return Ok(self.reject(errors)),
        };

        match self.store.find_by_id(id).await? {
            Some(entity) => {
                self.log.info(&format!("Successfully got {} with id: {id}", R::NAME));
                Ok(Outcome::Found(R::ReadDto::from(&entity)))
            }
            None => Ok(self.not_found(id)),
        }
    }

    async fn try_create(
        &self,
        payload: Result<R::CreateDto, ValidationErrors>,
    ) -> HandlerResult<R::ReadDto> {
        self.log.warn(&format!("{} submission attempted", R::NAME));

        let dto = match payload {
            Ok(dto) => dto,
            Err(errors) => return Ok(self.reject(errors)),
        };
        if let Err(errors) = dto.validate() {
            return Ok(self.reject(errors));
        }

        let mut entity: R = dto.into();
        if !self.store.create(&mut entity).await? {
            return Ok(self.failed(&format!("{} creation failed", R::NAME)));
        }

        let id = entity.id();
        self.log.info(&format!("{} created with id: {id}", R::NAME));
        Ok(Outcome::Created {
            location: format!("/api/{}/{id}", R::PATH),
            body: R::ReadDto::from(&entity),
        })
    }

    async fn try_update(
        &self,
        raw_id: &str,
        payload: Result<R::UpdateDto, ValidationErrors>,
    ) -> HandlerResult<R::ReadDto> {
        self.log.info(&format!("{} with id: {} update attempted", R::NAME, loggable_id(raw_id)));

        let id = match parse_id(raw_id) {
            Ok(id) => id,
            Err(errors) => return Ok(self.reject(errors)),
        };
        let dto = match payload {
            Ok(dto) => dto,
            Err(errors) => return Ok(self.reject(errors)),
        };
        if R::update_id(&dto) != id.get() {
            return Ok(self.reject(ValidationErrors::field(
                format!("{} update failed with bad data", R::NAME),
                "id",
                format!("body id {} does not match path id {id}", R::update_id(&dto)),
            )));
        }
        if let Err(errors) = dto.validate() {
            return Ok(self.reject(errors));
        }

        if !self.store.exists(id).await? {
            return Ok(self.not_found(id));
        }

        let entity: R = dto.into();
        if !self.store.update(&entity).await? {
            return Ok(self.failed("Update operation failed"));
        }

        self.log.info(&format!("{} with id: {id} updated", R::NAME));
        Ok(Outcome::Updated)
    }

    async fn try_delete(&self, raw_id: &str) -> HandlerResult<R::ReadDto> {
        self.log.warn(&format!("{} with id: {} delete attempted", R::NAME, loggable_id(raw_id)));

        let id = match parse_id(raw_id) {
            Ok(id) => id,
            Err(errors) => return Ok(self.reject(errors)),
        };

        if !self.store.exists(id).await? {
            return Ok(self.not_found(id));
        }
        // Delete the live row, never an id-only placeholder.
        let Some(entity) = self.store.find_by_id(id).await? else {
            return Ok(self.not_found(id));
        };

        if !self.store.delete(entity).await? {
            return Ok(self.failed(&format!("{} delete failed", R::NAME)));
        }

        self.log.info(&format!("{} with id: {id} successfully deleted", R::NAME));
        Ok(Outcome::Deleted)
    }

    fn reject(&self, errors: ValidationErrors) -> Outcome<R::ReadDto> {
        self.log.warn(&format!("{} request rejected: {}", R::NAME, errors.message()));
        Outcome::BadRequest(errors)
    }

    fn not_found(&self, id: EntityId) -> Outcome<R::ReadDto> {
        self.log.warn(&format!("{} with id: {id} was not found", R::NAME));
        Outcome::NotFound
    }

    fn failed(&self, message: &str) -> Outcome<R::ReadDto> {
        self.log.error(message);
        Outcome::OperationFailed
    }
}

fn parse_id(raw: &str) -> Result<EntityId, ValidationErrors> {
    raw.parse::<EntityId>()
        .map_err(|e| ValidationErrors::field("Invalid id", "id", e.to_string()))
}

/// Longest path segment echoed into the log before it is cut.
const LOGGED_ID_MAX_CHARS: usize = 16;

/// Path segment as it may appear in a log line: quoted with control
/// characters escaped, and cut to `LOGGED_ID_MAX_CHARS`.
fn loggable_id(raw: &str) -> String {
    let mut chars = raw.chars();
    let head: String = chars.by_ref().take(LOGGED_ID_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head:?}...")
    } else {
        format!("{head:?}")
    }
}

//! Request pipeline behavior, exercised directly against `ResourceHandler`
//! with instrumented store doubles.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bookstore_api::app::dto::{AuthorCreateDto, AuthorDto, AuthorUpdateDto, ValidationErrors};
use bookstore_api::app::errors::Outcome;
use bookstore_api::app::handler::ResourceHandler;
use bookstore_core::{Author, EntityId};
use bookstore_infra::{EntityStore, InMemoryEntityStore, StoreError, StoreResult};
use bookstore_observability::{MemoryOutcomeLog, Severity};

/// In-memory store that counts calls; optionally rejects writes, faults, or
/// loses rows between the existence check and the re-read.
#[derive(Default)]
struct InstrumentedStore {
    inner: InMemoryEntityStore<Author>,
    calls: AtomicUsize,
    mutations: AtomicUsize,
    reject_writes: bool,
    fault: bool,
    vanishing: bool,
}

impl InstrumentedStore {
    fn rejecting() -> Self {
        Self {
            reject_writes: true,
            ..Default::default()
        }
    }

    fn faulting() -> Self {
        Self {
            fault: true,
            ..Default::default()
        }
    }

    /// `exists` still sees the row, `find_by_id` no longer does: a concurrent
    /// delete landed in between.
    fn vanishing() -> Self {
        Self {
            vanishing: true,
            ..Default::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn mutations(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    fn enter(&self, mutating: bool) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if mutating {
            self.mutations.fetch_add(1, Ordering::SeqCst);
        }
        if self.fault {
            return Err(StoreError::Unavailable("connection reset by peer".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl EntityStore<Author> for InstrumentedStore {
    async fn find_all(&self) -> StoreResult<Vec<Author>> {
        self.enter(false)?;
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: EntityId) -> StoreResult<Option<Author>> {
        self.enter(false)?;
        if self.vanishing {
            return Ok(None);
        }
        self.inner.find_by_id(id).await
    }

    async fn exists(&self, id: EntityId) -> StoreResult<bool> {
        self.enter(false)?;
        self.inner.exists(id).await
    }

    async fn create(&self, entity: &mut Author) -> StoreResult<bool> {
        self.enter(true)?;
        if self.reject_writes {
            return Ok(false);
        }
        self.inner.create(entity).await
    }

    async fn update(&self, entity: &Author) -> StoreResult<bool> {
        self.enter(true)?;
        if self.reject_writes {
            return Ok(false);
        }
        self.inner.update(entity).await
    }

    async fn delete(&self, entity: Author) -> StoreResult<bool> {
        self.enter(true)?;
        if self.reject_writes {
            return Ok(false);
        }
        self.inner.delete(entity).await
    }
}

struct Fixture {
    store: Arc<InstrumentedStore>,
    log: Arc<MemoryOutcomeLog>,
    handler: ResourceHandler<Author>,
}

impl Fixture {
    fn with_store(store: InstrumentedStore) -> Self {
        let store = Arc::new(store);
        let log = Arc::new(MemoryOutcomeLog::new());
        let handler = ResourceHandler::new(store.clone(), log.clone());
        Self { store, log, handler }
    }

    fn new() -> Self {
        Self::with_store(InstrumentedStore::default())
    }

    async fn seed(&self, first: &str, last: &str) -> i32 {
        let mut author = Author::new(first, last, None);
        assert!(self.store.inner.create(&mut author).await.unwrap());
        author.id.get()
    }
}

fn create_dto(first: &str, last: &str) -> Result<AuthorCreateDto, ValidationErrors> {
    Ok(AuthorCreateDto {
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        bio: None,
    })
}

fn update_dto(id: i32, first: &str, last: &str) -> Result<AuthorUpdateDto, ValidationErrors> {
    Ok(AuthorUpdateDto {
        id,
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        bio: None,
    })
}

fn expect_found(outcome: Outcome<AuthorDto>) -> AuthorDto {
    match outcome {
        Outcome::Found(dto) => dto,
        other => panic!("expected Found, got {other:?}"),
    }
}

#[tokio::test]
async fn create_then_find_returns_same_fields() {
    let fx = Fixture::new();

    let (location, created) = match fx.handler.create(create_dto("Ada", "Lovelace")).await {
        Outcome::Created { location, body } => (location, body),
        other => panic!("expected Created, got {other:?}"),
    };
    assert!(created.id > 0);
    assert_eq!(location, format!("/api/authors/{}", created.id));

    let found = expect_found(fx.handler.find_by_id(&created.id.to_string()).await);
    assert_eq!(found, created);
    assert_eq!(found.first_name, "Ada");
    assert_eq!(found.last_name, "Lovelace");
}

#[tokio::test]
async fn find_all_on_empty_store_is_an_empty_list() {
    let fx = Fixture::new();
    match fx.handler.find_all().await {
        Outcome::Listed(items) => assert!(items.is_empty()),
        other => panic!("expected Listed, got {other:?}"),
    }
}

#[tokio::test]
async fn find_all_preserves_store_order() {
    let fx = Fixture::new();
    fx.seed("A", "1").await;
    fx.seed("B", "2").await;
    fx.seed("C", "3").await;

    match fx.handler.find_all().await {
        Outcome::Listed(items) => {
            let names: Vec<_> = items.iter().map(|a| a.first_name.as_str()).collect();
            assert_eq!(names, ["A", "B", "C"]);
        }
        other => panic!("expected Listed, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_path_id_is_rejected_before_any_store_call() {
    let fx = Fixture::new();

    for raw in ["-1", "0", "abc"] {
        assert!(matches!(fx.handler.find_by_id(raw).await, Outcome::BadRequest(_)));
        assert!(matches!(fx.handler.delete(raw).await, Outcome::BadRequest(_)));
        assert!(matches!(
            fx.handler.update(raw, update_dto(1, "A", "B")).await,
            Outcome::BadRequest(_)
        ));
    }

    assert_eq!(fx.store.calls(), 0);
}

#[tokio::test]
async fn unknown_id_is_not_found_without_mutation() {
    let fx = Fixture::new();

    assert!(matches!(fx.handler.find_by_id("41").await, Outcome::NotFound));
    assert!(matches!(
        fx.handler.update("41", update_dto(41, "A", "B")).await,
        Outcome::NotFound
    ));
    assert!(matches!(fx.handler.delete("41").await, Outcome::NotFound));

    assert_eq!(fx.store.mutations(), 0);
    assert_eq!(fx.log.last().unwrap().severity, Severity::Warn);
}

#[tokio::test]
async fn mismatched_update_id_is_bad_request_without_store_call() {
    let fx = Fixture::new();
    let id = fx.seed("A", "B").await;
    let before = fx.store.calls();

    let outcome = fx.handler.update(&id.to_string(), update_dto(id + 1, "C", "B")).await;

    match outcome {
        Outcome::BadRequest(errors) => assert!(errors.errors().contains_key("id")),
        other => panic!("expected BadRequest, got {other:?}"),
    }
    assert_eq!(fx.store.calls(), before);
}

#[tokio::test]
async fn missing_or_incomplete_payload_is_bad_request() {
    let fx = Fixture::new();

    let absent = fx
        .handler
        .create(Err(ValidationErrors::field("Empty request", "body", "missing")))
        .await;
    assert!(matches!(absent, Outcome::BadRequest(_)));

    let incomplete = fx
        .handler
        .create(Ok(AuthorCreateDto {
            first_name: Some("OnlyFirst".to_string()),
            ..Default::default()
        }))
        .await;
    match incomplete {
        Outcome::BadRequest(errors) => assert!(errors.errors().contains_key("lastName")),
        other => panic!("expected BadRequest, got {other:?}"),
    }

    assert_eq!(fx.store.calls(), 0);
    assert_eq!(fx.log.count(Severity::Error), 0);
}

#[tokio::test]
async fn update_replaces_fields() {
    let fx = Fixture::new();
    let id = fx.seed("A", "B").await;

    let outcome = fx.handler.update(&id.to_string(), update_dto(id, "C", "B")).await;
    assert!(matches!(outcome, Outcome::Updated));

    let found = expect_found(fx.handler.find_by_id(&id.to_string()).await);
    assert_eq!(found.first_name, "C");
}

#[tokio::test]
async fn delete_removes_the_entity() {
    let fx = Fixture::new();
    let id = fx.seed("A", "B").await;

    assert!(matches!(fx.handler.delete(&id.to_string()).await, Outcome::Deleted));
    assert!(matches!(fx.handler.find_by_id(&id.to_string()).await, Outcome::NotFound));
}

#[tokio::test]
async fn rejected_write_is_operation_failed_and_logged_as_error() {
    let fx = Fixture::with_store(InstrumentedStore::rejecting());

    let outcome = fx.handler.create(create_dto("A", "B")).await;

    assert!(matches!(outcome, Outcome::OperationFailed));
    let last = fx.log.last().unwrap();
    assert_eq!(last.severity, Severity::Error);
    assert_eq!(last.message, "Author creation failed");
}

#[tokio::test]
async fn rejected_update_is_operation_failed_and_logged_as_error() {
    let fx = Fixture::with_store(InstrumentedStore::rejecting());
    let id = fx.seed("A", "B").await;

    let outcome = fx.handler.update(&id.to_string(), update_dto(id, "C", "B")).await;

    assert!(matches!(outcome, Outcome::OperationFailed));
    assert_eq!(fx.store.mutations(), 1);
    let last = fx.log.last().unwrap();
    assert_eq!(last.severity, Severity::Error);
    assert_eq!(last.message, "Update operation failed");

    // The stored row is untouched.
    let stored = fx.store.inner.find_by_id(EntityId::from_raw(id)).await.unwrap().unwrap();
    assert_eq!(stored.firstname, "A");
}

#[tokio::test]
async fn rejected_delete_is_operation_failed_and_logged_as_error() {
    let fx = Fixture::with_store(InstrumentedStore::rejecting());
    let id = fx.seed("A", "B").await;

    let outcome = fx.handler.delete(&id.to_string()).await;

    assert!(matches!(outcome, Outcome::OperationFailed));
    assert_eq!(fx.store.mutations(), 1);
    let last = fx.log.last().unwrap();
    assert_eq!(last.severity, Severity::Error);
    assert_eq!(last.message, "Author delete failed");
    assert!(fx.store.inner.exists(EntityId::from_raw(id)).await.unwrap());
}

#[tokio::test]
async fn delete_of_row_removed_after_existence_check_is_not_found() {
    let fx = Fixture::with_store(InstrumentedStore::vanishing());
    let id = fx.seed("A", "B").await;

    let outcome = fx.handler.delete(&id.to_string()).await;

    assert!(matches!(outcome, Outcome::NotFound));
    // exists + find_by_id, and no delete call.
    assert_eq!(fx.store.calls(), 2);
    assert_eq!(fx.store.mutations(), 0);
    assert_eq!(fx.log.last().unwrap().severity, Severity::Warn);
}

#[tokio::test]
async fn store_fault_is_caught_once_at_the_boundary() {
    let fx = Fixture::with_store(InstrumentedStore::faulting());

    assert!(matches!(fx.handler.find_all().await, Outcome::Fault));
    assert!(matches!(fx.handler.find_by_id("1").await, Outcome::Fault));
    assert!(matches!(fx.handler.create(create_dto("A", "B")).await, Outcome::Fault));
    assert!(matches!(fx.handler.update("1", update_dto(1, "A", "B")).await, Outcome::Fault));
    assert!(matches!(fx.handler.delete("1").await, Outcome::Fault));

    assert_eq!(fx.log.count(Severity::Error), 5);
    let last = fx.log.last().unwrap();
    assert!(last.message.contains("connection reset by peer"));
}

#[tokio::test]
async fn every_operation_logs_attempt_and_exactly_one_terminal_entry() {
    let fx = Fixture::new();

    fx.handler.find_all().await;
    assert_eq!(fx.log.entries().len(), 2);

    fx.handler.find_by_id("-5").await;
    assert_eq!(fx.log.entries().len(), 4);
    assert_eq!(fx.log.last().unwrap().severity, Severity::Warn);

    fx.handler.create(create_dto("A", "B")).await;
    let entries = fx.log.entries();
    assert_eq!(entries.len(), 6);
    assert_eq!(entries[4].severity, Severity::Warn);
    assert_eq!(entries[5].severity, Severity::Info);
}

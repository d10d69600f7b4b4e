//! Infrastructure layer: entity stores (in-memory and Postgres).

pub mod store;

pub use store::{EntityStore, InMemoryCatalog, InMemoryEntityStore, StoreError, StoreResult};

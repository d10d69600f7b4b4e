//! Store + handler wiring.

use std::sync::Arc;

use bookstore_core::{Author, Book};
use bookstore_infra::{EntityStore, InMemoryCatalog};
use bookstore_observability::TracingOutcomeLog;

use crate::app::handler::{Resource, ResourceHandler};
use crate::config::StoreBackend;

/// Everything the routes need: one handler per resource.
pub struct AppServices {
    pub authors: ResourceHandler<Author>,
    pub books: ResourceHandler<Book>,
}

impl AppServices {
    /// Wire handlers over the given stores, logging outcomes through `tracing`.
    pub fn with_stores(
        authors: Arc<dyn EntityStore<Author>>,
        books: Arc<dyn EntityStore<Book>>,
    ) -> Self {
        Self {
            authors: ResourceHandler::new(authors, Arc::new(TracingOutcomeLog::new(Author::PATH))),
            books: ResourceHandler::new(books, Arc::new(TracingOutcomeLog::new(Book::PATH))),
        }
    }

    /// In-memory wiring (dev/test). Both handlers share one catalog so the
    /// author/book relations hold as they do on Postgres.
    pub fn in_memory() -> Self {
        let catalog = Arc::new(InMemoryCatalog::new());
        Self::with_stores(catalog.clone(), catalog)
    }
}

/// Build services for the configured backend.
pub async fn build_services(backend: &StoreBackend) -> anyhow::Result<AppServices> {
    match backend {
        StoreBackend::Memory => {
            tracing::info!("using in-memory stores");
            Ok(AppServices::in_memory())
        }
        StoreBackend::Postgres { database_url } => build_postgres_services(database_url).await,
    }
}

#[cfg(feature = "postgres")]
async fn build_postgres_services(database_url: &str) -> anyhow::Result<AppServices> {
    use anyhow::Context;
    use bookstore_infra::store::postgres::{ensure_schema, PostgresAuthorStore, PostgresBookStore};

    let pool = sqlx::PgPool::connect(database_url)
        .await
        .context("failed to connect to Postgres")?;
    ensure_schema(&pool)
        .await
        .context("failed to create bookstore schema")?;

    tracing::info!("using Postgres stores");
    Ok(AppServices::with_stores(
        Arc::new(PostgresAuthorStore::new(pool.clone())),
        Arc::new(PostgresBookStore::new(pool)),
    ))
}

#[cfg(not(feature = "postgres"))]
async fn build_postgres_services(_database_url: &str) -> anyhow::Result<AppServices> {
    anyhow::bail!("STORE_BACKEND=postgres requires building with the `postgres` feature")
}

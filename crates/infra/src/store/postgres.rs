//! Postgres-backed entity stores.
//!
//! One concrete store per entity: the table layout is entity-specific, so a
//! fully generic SQL implementation would need a table mapping layer that the
//! two entities do not justify.
//!
//! Constraint violations (unique, foreign key, check) are reported as a
//! rejected write (`Ok(false)`); every other database error is a fault.

use std::sync::Arc;

use bookstore_core::{Author, Book, Entity, EntityId};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::{EntityStore, StoreError, StoreResult};

/// Create the `authors` and `books` tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> StoreResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS authors (
            id        SERIAL PRIMARY KEY,
            firstname TEXT NOT NULL,
            lastname  TEXT NOT NULL,
            bio       VARCHAR(250) NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id        SERIAL PRIMARY KEY,
            title     VARCHAR(50) NOT NULL,
            year      INTEGER NULL,
            isbn      TEXT NOT NULL UNIQUE,
            summary   VARCHAR(500) NULL,
            image     TEXT NULL,
            price     DOUBLE PRECISION NULL,
            author_id INTEGER NOT NULL REFERENCES authors (id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

fn rejected_write(err: sqlx::Error) -> StoreResult<bool> {
    let constraint = matches!(
        &err,
        sqlx::Error::Database(db)
            if db.is_unique_violation() || db.is_foreign_key_violation() || db.is_check_violation()
    );
    if constraint {
        tracing::warn!(error = %err, "write rejected by database constraint");
        return Ok(false);
    }
    Err(StoreError::Database(err))
}

fn decode<T>(row: &PgRow, column: &str) -> StoreResult<T>
where
    T: for<'r> sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get::<T, _>(column)
        .map_err(|e| StoreError::Corrupt(format!("{column}: {e}")))
}

// -------------------------
// Authors
// -------------------------

/// Postgres store for `Author` rows (`authors` table).
#[derive(Debug, Clone)]
pub struct PostgresAuthorStore {
    pool: Arc<PgPool>,
}

impl PostgresAuthorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }

    fn author_from_row(row: &PgRow) -> StoreResult<Author> {
        Ok(Author {
            id: EntityId::from_raw(decode(row, "id")?),
            firstname: decode(row, "firstname")?,
            lastname: decode(row, "lastname")?,
            bio: decode(row, "bio")?,
        })
    }
}

#[async_trait::async_trait]
impl EntityStore<Author> for PostgresAuthorStore {
    async fn find_all(&self) -> StoreResult<Vec<Author>> {
        let rows = sqlx::query("SELECT id, firstname, lastname, bio FROM authors ORDER BY id")
            .fetch_all(&*self.pool)
            .await?;
        rows.iter().map(Self::author_from_row).collect()
    }

    async fn find_by_id(&self, id: EntityId) -> StoreResult<Option<Author>> {
        let row = sqlx::query("SELECT id, firstname, lastname, bio FROM authors WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await?;
        row.as_ref().map(Self::author_from_row).transpose()
    }

    async fn exists(&self, id: EntityId) -> StoreResult<bool> {
        let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM authors WHERE id = $1) AS present")
            .bind(id.get())
            .fetch_one(&*self.pool)
            .await?;
        decode(&row, "present")
    }

    async fn create(&self, entity: &mut Author) -> StoreResult<bool> {
        let inserted = sqlx::query(
            "INSERT INTO authors (firstname, lastname, bio) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&entity.firstname)
        .bind(&entity.lastname)
        .bind(&entity.bio)
        .fetch_optional(&*self.pool)
        .await;

        match inserted {
            Ok(Some(row)) => {
                entity.assign_id(EntityId::from_raw(decode(&row, "id")?));
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => rejected_write(e),
        }
    }

    async fn update(&self, entity: &Author) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE authors SET firstname = $2, lastname = $3, bio = $4 WHERE id = $1",
        )
        .bind(entity.id.get())
        .bind(&entity.firstname)
        .bind(&entity.lastname)
        .bind(&entity.bio)
        .execute(&*self.pool)
        .await;

        match result {
            Ok(done) => Ok(done.rows_affected() > 0),
            Err(e) => rejected_write(e),
        }
    }

    async fn delete(&self, entity: Author) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(entity.id.get())
            .execute(&*self.pool)
            .await;

        match result {
            Ok(done) => Ok(done.rows_affected() > 0),
            Err(e) => rejected_write(e),
        }
    }
}

// -------------------------
// Books
// -------------------------

const BOOK_COLUMNS: &str = "id, title, year, isbn, summary, image, price, author_id";

/// Postgres store for `Book` rows (`books` table).
#[derive(Debug, Clone)]
pub struct PostgresBookStore {
    pool: Arc<PgPool>,
}

impl PostgresBookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }

    fn book_from_row(row: &PgRow) -> StoreResult<Book> {
        Ok(Book {
            id: EntityId::from_raw(decode(row, "id")?),
            title: decode(row, "title")?,
            year: decode(row, "year")?,
            isbn: decode(row, "isbn")?,
            summary: decode(row, "summary")?,
            image: decode(row, "image")?,
            price: decode(row, "price")?,
            author_id: EntityId::from_raw(decode(row, "author_id")?),
        })
    }
}

#[async_trait::async_trait]
impl EntityStore<Book> for PostgresBookStore {
    async fn find_all(&self) -> StoreResult<Vec<Book>> {
        let rows = sqlx::query(&format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY id"))
            .fetch_all(&*self.pool)
            .await?;
        rows.iter().map(Self::book_from_row).collect()
    }

    async fn find_by_id(&self, id: EntityId) -> StoreResult<Option<Book>> {
        let row = sqlx::query(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1"))
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await?;
        row.as_ref().map(Self::book_from_row).transpose()
    }

    async fn exists(&self, id: EntityId) -> StoreResult<bool> {
        let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM books WHERE id = $1) AS present")
            .bind(id.get())
            .fetch_one(&*self.pool)
            .await?;
        decode(&row, "present")
    }

    async fn create(&self, entity: &mut Book) -> StoreResult<bool> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO books (title, year, isbn, summary, image, price, author_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&entity.title)
        .bind(entity.year)
        .bind(&entity.isbn)
        .bind(&entity.summary)
        .bind(&entity.image)
        .bind(entity.price)
        .bind(entity.author_id.get())
        .fetch_optional(&*self.pool)
        .await;

        match inserted {
            Ok(Some(row)) => {
                entity.assign_id(EntityId::from_raw(decode(&row, "id")?));
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => rejected_write(e),
        }
    }

    async fn update(&self, entity: &Book) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $2, year = $3, isbn = $4, summary = $5, image = $6, price = $7, author_id = $8
            WHERE id = $1
            "#,
        )
        .bind(entity.id.get())
        .bind(&entity.title)
        .bind(entity.year)
        .bind(&entity.isbn)
        .bind(&entity.summary)
        .bind(&entity.image)
        .bind(entity.price)
        .bind(entity.author_id.get())
        .execute(&*self.pool)
        .await;

        match result {
            Ok(done) => Ok(done.rows_affected() > 0),
            Err(e) => rejected_write(e),
        }
    }

    async fn delete(&self, entity: Book) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(entity.id.get())
            .execute(&*self.pool)
            .await;

        match result {
            Ok(done) => Ok(done.rows_affected() > 0),
            Err(e) => rejected_write(e),
        }
    }
}

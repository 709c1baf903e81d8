//! Persistence layer: SQLite pool management, schema application, and the
//! per-entity repositories that are the only write path into the store.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

pub mod authors;
pub mod books;
pub mod entity;
pub mod error;
pub mod repository;

pub use authors::AuthorRepository;
pub use books::BookRepository;
pub use entity::{Author, Book};
pub use error::RepoError;
pub use repository::Repository;

/// Handle to the relational store. Cheap to clone; all repositories share
/// the same underlying pool.
#[derive(Clone, Debug)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Connect to the database described by a sqlx URL, creating the file
    /// when missing. Foreign keys are enabled on every connection so the
    /// store enforces referential integrity (books -> authors).
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, RepoError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// In-memory database on a single connection, used by tests.
    /// A single connection is required: each SQLite `:memory:` connection
    /// sees its own database.
    pub async fn in_memory() -> Result<Self, RepoError> {
        Self::connect("sqlite::memory:", 1).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Apply `(module, id, sql)` migration scripts in the order given.
    /// Scripts are replayed on every boot and must be idempotent.
    pub async fn apply_migrations<'a, I>(&self, migrations: I) -> Result<(), RepoError>
    where
        I: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    {
        for (module, id, sql) in migrations {
            tracing::info!(module, id, "applying migration");
            sqlx::raw_sql(sql).execute(&self.pool).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Db;

    /// Schema mirroring the migrations the authors/books modules contribute.
    pub const SCHEMA: &str = r#"
        CREATE TABLE IF NOT EXISTS authors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            bio TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            year INTEGER,
            isbn TEXT NOT NULL,
            summary TEXT,
            image TEXT,
            price REAL,
            author_id INTEGER NOT NULL,
            FOREIGN KEY (author_id) REFERENCES authors (id) ON DELETE RESTRICT
        );
    "#;

    pub async fn test_db() -> Db {
        let db = Db::in_memory().await.expect("in-memory database");
        db.apply_migrations([("test", "001_schema", SCHEMA)])
            .await
            .expect("schema applied");
        db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_and_apply_migrations() {
        let db = test_support::test_db().await;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = test_support::test_db().await;

        // Replaying the same script must not fail.
        db.apply_migrations([("test", "001_schema", test_support::SCHEMA)])
            .await
            .unwrap();
    }
}

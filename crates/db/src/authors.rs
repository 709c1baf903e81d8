use async_trait::async_trait;
use sqlx::SqlitePool;

use bookstore_telemetry::Logger;

use crate::entity::Author;
use crate::error::RepoError;
use crate::repository::Repository;
use crate::Db;

/// CRUD facade over the `authors` table.
#[derive(Clone)]
pub struct AuthorRepository {
    pool: SqlitePool,
    logger: Logger,
}

impl AuthorRepository {
    pub fn new(db: &Db, logger: Logger) -> Self {
        Self {
            pool: db.pool().clone(),
            logger,
        }
    }
}

#[async_trait]
impl Repository for AuthorRepository {
    type Entity = Author;
    type Id = i64;

    async fn find_all(&self) -> Result<Vec<Author>, RepoError> {
        self.logger.debug("find_all: querying authors");
        let authors = sqlx::query_as::<_, Author>(
            "SELECT id, first_name, last_name, bio FROM authors ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(authors)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Author>, RepoError> {
        self.logger.debug(format!("find_by_id: {id}"));
        let author = sqlx::query_as::<_, Author>(
            "SELECT id, first_name, last_name, bio FROM authors WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(author)
    }

    async fn exists(&self, id: i64) -> Result<bool, RepoError> {
        let found: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(found != 0)
    }

    async fn create(&self, entity: &Author) -> Result<i64, RepoError> {
        self.logger.debug("create: inserting author");
        let result = sqlx::query("INSERT INTO authors (first_name, last_name, bio) VALUES (?, ?, ?)")
            .bind(&entity.first_name)
            .bind(&entity.last_name)
            .bind(&entity.bio)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    async fn update(&self, entity: &Author) -> Result<(), RepoError> {
        self.logger.debug(format!("update: {}", entity.id));
        let result = sqlx::query(
            "UPDATE authors SET first_name = ?, last_name = ?, bio = ? WHERE id = ?",
        )
        .bind(&entity.first_name)
        .bind(&entity.last_name)
        .bind(&entity.bio)
        .bind(entity.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.logger.debug(format!("delete: {id}"));
        let result = sqlx::query("DELETE FROM authors WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;

    fn jane() -> Author {
        Author {
            id: 0,
            first_name: "Jane".to_string(),
            last_name: "Austen".to_string(),
            bio: "English novelist".to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_find_by_id_round_trips() {
        let db = test_db().await;
        let repo = AuthorRepository::new(&db, Logger::new("authors-repo"));

        let id = repo.create(&jane()).await.unwrap();
        assert!(id >= 1);

        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.first_name, "Jane");
        assert_eq!(found.last_name, "Austen");
        assert_eq!(found.bio, "English novelist");
    }

    #[tokio::test]
    async fn find_by_id_returns_none_for_unknown_id() {
        let db = test_db().await;
        let repo = AuthorRepository::new(&db, Logger::new("authors-repo"));

        assert!(repo.find_by_id(42).await.unwrap().is_none());
        assert!(!repo.exists(42).await.unwrap());
    }

    #[tokio::test]
    async fn update_replaces_whole_entity() {
        let db = test_db().await;
        let repo = AuthorRepository::new(&db, Logger::new("authors-repo"));

        let id = repo.create(&jane()).await.unwrap();
        let updated = Author {
            id,
            first_name: "Jane".to_string(),
            last_name: "Austen".to_string(),
            bio: "Author of Pride and Prejudice".to_string(),
        };
        repo.update(&updated).await.unwrap();

        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found, updated);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let db = test_db().await;
        let repo = AuthorRepository::new(&db, Logger::new("authors-repo"));

        let ghost = Author {
            id: 99,
            ..jane()
        };
        let err = repo.update(&ghost).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }

    #[tokio::test]
    async fn delete_removes_row_and_unknown_id_is_not_found() {
        let db = test_db().await;
        let repo = AuthorRepository::new(&db, Logger::new("authors-repo"));

        let id = repo.create(&jane()).await.unwrap();
        repo.delete(id).await.unwrap();
        assert!(repo.find_by_id(id).await.unwrap().is_none());

        let err = repo.delete(id).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }

    #[tokio::test]
    async fn find_all_lists_in_id_order() {
        let db = test_db().await;
        let repo = AuthorRepository::new(&db, Logger::new("authors-repo"));

        repo.create(&jane()).await.unwrap();
        let second = Author {
            id: 0,
            first_name: "Charles".to_string(),
            last_name: "Dickens".to_string(),
            bio: "Victorian novelist".to_string(),
        };
        repo.create(&second).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].id < all[1].id);
    }
}

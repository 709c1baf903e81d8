use async_trait::async_trait;
use sqlx::SqlitePool;

use bookstore_telemetry::Logger;

use crate::entity::Book;
use crate::error::RepoError;
use crate::repository::Repository;
use crate::Db;

const BOOK_COLUMNS: &str = "id, title, year, isbn, summary, image, price, author_id";

/// CRUD facade over the `books` table.
#[derive(Clone)]
pub struct BookRepository {
    pool: SqlitePool,
    logger: Logger,
}

impl BookRepository {
    pub fn new(db: &Db, logger: Logger) -> Self {
        Self {
            pool: db.pool().clone(),
            logger,
        }
    }

    /// Books owned by one author, used for nested author responses.
    pub async fn find_by_author(&self, author_id: i64) -> Result<Vec<Book>, RepoError> {
        self.logger
            .debug(format!("find_by_author: {author_id}"));
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE author_id = ? ORDER BY id"
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }
}

#[async_trait]
impl Repository for BookRepository {
    type Entity = Book;
    type Id = i64;

    async fn find_all(&self) -> Result<Vec<Book>, RepoError> {
        self.logger.debug("find_all: querying books");
        let books =
            sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY id"))
                .fetch_all(&self.pool)
                .await?;
        Ok(books)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Book>, RepoError> {
        self.logger.debug(format!("find_by_id: {id}"));
        let book =
            sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(book)
    }

    async fn exists(&self, id: i64) -> Result<bool, RepoError> {
        let found: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(found != 0)
    }

    async fn create(&self, entity: &Book) -> Result<i64, RepoError> {
        self.logger.debug("create: inserting book");
        let result = sqlx::query(
            "INSERT INTO books (title, year, isbn, summary, image, price, author_id) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&entity.title)
        .bind(entity.year)
        .bind(&entity.isbn)
        .bind(&entity.summary)
        .bind(&entity.image)
        .bind(entity.price)
        .bind(entity.author_id)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn update(&self, entity: &Book) -> Result<(), RepoError> {
        self.logger.debug(format!("update: {}", entity.id));
        let result = sqlx::query(
            "UPDATE books SET title = ?, year = ?, isbn = ?, summary = ?, image = ?, \
             price = ?, author_id = ? WHERE id = ?",
        )
        .bind(&entity.title)
        .bind(entity.year)
        .bind(&entity.isbn)
        .bind(&entity.summary)
        .bind(&entity.image)
        .bind(entity.price)
        .bind(entity.author_id)
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
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
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
    use crate::authors::AuthorRepository;
    use crate::entity::Author;
    use crate::test_support::test_db;

    async fn seeded_author(db: &Db) -> i64 {
        let repo = AuthorRepository::new(db, Logger::new("authors-repo"));
        repo.create(&Author {
            id: 0,
            first_name: "Jane".to_string(),
            last_name: "Austen".to_string(),
            bio: "English novelist".to_string(),
        })
        .await
        .unwrap()
    }

    fn emma(author_id: i64) -> Book {
        Book {
            id: 0,
            title: "Emma".to_string(),
            year: Some(1815),
            isbn: "978-0-19-953552-1".to_string(),
            summary: None,
            image: None,
            price: Some(9.99),
            author_id,
        }
    }

    #[tokio::test]
    async fn create_then_find_round_trips() {
        let db = test_db().await;
        let author_id = seeded_author(&db).await;
        let repo = BookRepository::new(&db, Logger::new("books-repo"));

        let id = repo.create(&emma(author_id)).await.unwrap();
        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.title, "Emma");
        assert_eq!(found.year, Some(1815));
        assert_eq!(found.author_id, author_id);
    }

    #[tokio::test]
    async fn create_with_unknown_author_is_conflict() {
        let db = test_db().await;
        let repo = BookRepository::new(&db, Logger::new("books-repo"));

        let err = repo.create(&emma(999)).await.unwrap_err();
        assert!(err.is_conflict(), "expected Conflict, got {err:?}");
    }

    #[tokio::test]
    async fn deleting_author_with_books_is_conflict() {
        let db = test_db().await;
        let author_id = seeded_author(&db).await;
        let books = BookRepository::new(&db, Logger::new("books-repo"));
        books.create(&emma(author_id)).await.unwrap();

        let authors = AuthorRepository::new(&db, Logger::new("authors-repo"));
        let err = authors.delete(author_id).await.unwrap_err();
        assert!(err.is_conflict(), "expected Conflict, got {err:?}");
    }

    #[tokio::test]
    async fn find_by_author_lists_only_that_authors_books() {
        let db = test_db().await;
        let author_id = seeded_author(&db).await;
        let other_author = seeded_author(&db).await;
        let repo = BookRepository::new(&db, Logger::new("books-repo"));

        repo.create(&emma(author_id)).await.unwrap();
        repo.create(&Book {
            title: "Persuasion".to_string(),
            ..emma(other_author)
        })
        .await
        .unwrap();

        let books = repo.find_by_author(author_id).await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Emma");
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let db = test_db().await;
        let author_id = seeded_author(&db).await;
        let repo = BookRepository::new(&db, Logger::new("books-repo"));

        let ghost = Book {
            id: 404,
            ..emma(author_id)
        };
        let err = repo.update(&ghost).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }
}

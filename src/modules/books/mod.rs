pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};

use bookstore_authz::{authenticate, require_any, IdentityStore, DELETE_ROLES, WRITE_ROLES};
use bookstore_db::{BookRepository, Db, Repository};
use bookstore_http::error::AppError;
use bookstore_kernel::{InitCtx, Migration, Module};
use bookstore_telemetry::Logger;

use crate::modules::{auth_error, repo_error};
use models::{BookCreate, BookResponse, BookUpdate};

const BOOKS_TABLE: &str = r#"
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

#[derive(Clone)]
struct BooksState {
    books: BookRepository,
    identity: IdentityStore,
    logger: Logger,
}

/// Books module: CRUD over `/api/books`.
pub struct BooksModule {
    state: BooksState,
}

/// Create a new instance of the books module.
pub fn create_module(db: &Db, identity: IdentityStore) -> Arc<dyn Module> {
    Arc::new(BooksModule {
        state: BooksState {
            books: BookRepository::new(db, Logger::new("books-repository")),
            identity,
            logger: Logger::new("books"),
        },
    })
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_books).post(create_book))
            .route("/{id}", get(get_book).put(update_book).delete(delete_book))
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": { "description": "List of books" },
                            "500": { "description": "Internal server error" }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "responses": {
                            "201": { "description": "Book created" },
                            "400": { "description": "Validation failed" },
                            "401": { "description": "Missing or invalid token" },
                            "403": { "description": "Caller lacks a write role" },
                            "409": { "description": "authorId references no author" }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "responses": {
                            "200": { "description": "The book" },
                            "404": { "description": "Unknown book id" }
                        }
                    },
                    "put": {
                        "summary": "Replace a book",
                        "tags": ["Books"],
                        "responses": {
                            "204": { "description": "Book replaced" },
                            "400": { "description": "Id mismatch or validation failure" },
                            "404": { "description": "Unknown book id" },
                            "409": { "description": "authorId references no author" }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "responses": {
                            "204": { "description": "Book removed" },
                            "404": { "description": "Unknown book id" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "title": { "type": "string" },
                            "year": { "type": "integer", "nullable": true },
                            "isbn": { "type": "string" },
                            "summary": { "type": "string", "maxLength": 250, "nullable": true },
                            "image": { "type": "string", "nullable": true },
                            "price": { "type": "number", "nullable": true },
                            "authorId": { "type": "integer" }
                        },
                        "required": ["id", "title", "isbn", "authorId"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_books",
            up: BOOKS_TABLE,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// GET / — full list, open access.
async fn list_books(State(state): State<BooksState>) -> Result<Json<Vec<BookResponse>>, AppError> {
    state.logger.info("list: attempted");

    let books = state.books.find_all().await.map_err(repo_error)?;
    let response: Vec<BookResponse> = books.into_iter().map(BookResponse::from).collect();

    state.logger.info("list: successful");
    Ok(Json(response))
}

/// GET /{id} — one book, open access.
async fn get_book(
    State(state): State<BooksState>,
    Path(id): Path<i64>,
) -> Result<Json<BookResponse>, AppError> {
    state.logger.info(format!("get: attempted with id {id}"));

    let Some(book) = state.books.find_by_id(id).await.map_err(repo_error)? else {
        state.logger.warn(format!("get: not found id {id}"));
        return Err(AppError::not_found("book not found"));
    };

    state.logger.info(format!("get: successful with id {id}"));
    Ok(Json(BookResponse::from(book)))
}

/// POST / — gated to write roles. An unknown `authorId` is rejected by the
/// store's foreign key and surfaces as 409.
async fn create_book(
    State(state): State<BooksState>,
    headers: HeaderMap,
    Json(body): Json<BookCreate>,
) -> Result<(StatusCode, Json<BookResponse>), AppError> {
    state.logger.info("create: attempted");

    let identity = authenticate(&headers, &state.identity)
        .await
        .map_err(auth_error)?;
    require_any(&identity, WRITE_ROLES).map_err(auth_error)?;

    let errors = body.validate();
    if !errors.is_empty() {
        state.logger.warn("create: incomplete data");
        return Err(AppError::validation(errors, "book payload failed validation"));
    }

    let mut book = bookstore_db::Book::from(&body);
    let id = state.books.create(&book).await.map_err(repo_error)?;
    book.id = id;

    state.logger.info(format!("create: successful with id {id}"));
    Ok((StatusCode::CREATED, Json(BookResponse::from(book))))
}

/// PUT /{id} — whole-entity replace, gated to write roles.
async fn update_book(
    State(state): State<BooksState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<BookUpdate>,
) -> Result<StatusCode, AppError> {
    state.logger.info(format!("update: attempted with id {id}"));

    let identity = authenticate(&headers, &state.identity)
        .await
        .map_err(auth_error)?;
    require_any(&identity, WRITE_ROLES).map_err(auth_error)?;

    if id < 1 || body.id != id {
        state.logger.warn(format!("update: id mismatch for id {id}"));
        return Err(AppError::bad_request("body id must match a positive path id"));
    }

    if !state.books.exists(id).await.map_err(repo_error)? {
        state.logger.warn(format!("update: not found id {id}"));
        return Err(AppError::not_found("book not found"));
    }

    let errors = body.validate();
    if !errors.is_empty() {
        state.logger.warn(format!("update: incomplete data for id {id}"));
        return Err(AppError::validation(errors, "book payload failed validation"));
    }

    state
        .books
        .update(&bookstore_db::Book::from(&body))
        .await
        .map_err(repo_error)?;

    state.logger.info(format!("update: successful with id {id}"));
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /{id} — gated to delete roles.
async fn delete_book(
    State(state): State<BooksState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.logger.info(format!("delete: attempted with id {id}"));

    let identity = authenticate(&headers, &state.identity)
        .await
        .map_err(auth_error)?;
    require_any(&identity, DELETE_ROLES).map_err(auth_error)?;

    if id < 1 {
        state.logger.warn(format!("delete: bad id {id}"));
        return Err(AppError::bad_request("id must be positive"));
    }

    if !state.books.exists(id).await.map_err(repo_error)? {
        state.logger.warn(format!("delete: not found id {id}"));
        return Err(AppError::not_found("book not found"));
    }

    state.books.delete(id).await.map_err(repo_error)?;

    state.logger.info(format!("delete: successful with id {id}"));
    Ok(StatusCode::NO_CONTENT)
}

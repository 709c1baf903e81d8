pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};

use bookstore_authz::{authenticate, require_any, IdentityStore, DELETE_ROLES, WRITE_ROLES};
use bookstore_db::{AuthorRepository, BookRepository, Db, Repository};
use bookstore_http::error::AppError;
use bookstore_kernel::{InitCtx, Migration, Module};
use bookstore_telemetry::Logger;

use crate::modules::{auth_error, repo_error};
use models::{AuthorCreate, AuthorResponse, AuthorUpdate};

const AUTHORS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS authors (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        bio TEXT NOT NULL
    );
"#;

#[derive(Clone)]
struct AuthorsState {
    authors: AuthorRepository,
    books: BookRepository,
    identity: IdentityStore,
    logger: Logger,
}

/// Authors module: CRUD over `/api/authors`.
pub struct AuthorsModule {
    state: AuthorsState,
}

/// Create a new instance of the authors module.
pub fn create_module(db: &Db, identity: IdentityStore) -> Arc<dyn Module> {
    Arc::new(AuthorsModule {
        state: AuthorsState {
            authors: AuthorRepository::new(db, Logger::new("authors-repository")),
            books: BookRepository::new(db, Logger::new("books-repository")),
            identity,
            logger: Logger::new("authors"),
        },
    })
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_authors).post(create_author))
            .route(
                "/{id}",
                get(get_author).put(update_author).delete(delete_author),
            )
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List authors",
                        "tags": ["Authors"],
                        "responses": {
                            "200": { "description": "List of authors" },
                            "500": { "description": "Internal server error" }
                        }
                    },
                    "post": {
                        "summary": "Create an author",
                        "tags": ["Authors"],
                        "responses": {
                            "201": { "description": "Author created" },
                            "400": { "description": "Validation failed" },
                            "401": { "description": "Missing or invalid token" },
                            "403": { "description": "Caller lacks a write role" }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get an author with book summaries",
                        "tags": ["Authors"],
                        "responses": {
                            "200": { "description": "The author" },
                            "404": { "description": "Unknown author id" }
                        }
                    },
                    "put": {
                        "summary": "Replace an author",
                        "tags": ["Authors"],
                        "responses": {
                            "204": { "description": "Author replaced" },
                            "400": { "description": "Id mismatch or validation failure" },
                            "404": { "description": "Unknown author id" }
                        }
                    },
                    "delete": {
                        "summary": "Delete an author",
                        "tags": ["Authors"],
                        "responses": {
                            "204": { "description": "Author removed" },
                            "404": { "description": "Unknown author id" },
                            "409": { "description": "Author still referenced by books" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Author": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "firstName": { "type": "string" },
                            "lastName": { "type": "string" },
                            "bio": { "type": "string", "maxLength": 250 }
                        },
                        "required": ["id", "firstName", "lastName", "bio"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_authors",
            up: AUTHORS_TABLE,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module stopped");
        Ok(())
    }
}

/// GET / — full list, open access.
async fn list_authors(
    State(state): State<AuthorsState>,
) -> Result<Json<Vec<AuthorResponse>>, AppError> {
    state.logger.info("list: attempted");

    let authors = state.authors.find_all().await.map_err(repo_error)?;
    let response: Vec<AuthorResponse> = authors.into_iter().map(AuthorResponse::from).collect();

    state.logger.info("list: successful");
    Ok(Json(response))
}

/// GET /{id} — one author with book summaries, open access.
async fn get_author(
    State(state): State<AuthorsState>,
    Path(id): Path<i64>,
) -> Result<Json<AuthorResponse>, AppError> {
    state.logger.info(format!("get: attempted with id {id}"));

    let Some(author) = state.authors.find_by_id(id).await.map_err(repo_error)? else {
        state.logger.warn(format!("get: not found id {id}"));
        return Err(AppError::not_found("author not found"));
    };
    let books = state.books.find_by_author(id).await.map_err(repo_error)?;

    state.logger.info(format!("get: successful with id {id}"));
    Ok(Json(AuthorResponse::with_books(author, books)))
}

/// POST / — gated to write roles.
async fn create_author(
    State(state): State<AuthorsState>,
    headers: HeaderMap,
    Json(body): Json<AuthorCreate>,
) -> Result<(StatusCode, Json<AuthorResponse>), AppError> {
    state.logger.info("create: attempted");

    let identity = authenticate(&headers, &state.identity)
        .await
        .map_err(auth_error)?;
    require_any(&identity, WRITE_ROLES).map_err(auth_error)?;

    let errors = body.validate();
    if !errors.is_empty() {
        state.logger.warn("create: incomplete data");
        return Err(AppError::validation(errors, "author payload failed validation"));
    }

    let mut author = bookstore_db::Author::from(&body);
    let id = state.authors.create(&author).await.map_err(repo_error)?;
    author.id = id;

    state.logger.info(format!("create: successful with id {id}"));
    Ok((StatusCode::CREATED, Json(AuthorResponse::from(author))))
}

/// PUT /{id} — whole-entity replace, gated to write roles.
async fn update_author(
    State(state): State<AuthorsState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<AuthorUpdate>,
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

    if !state.authors.exists(id).await.map_err(repo_error)? {
        state.logger.warn(format!("update: not found id {id}"));
        return Err(AppError::not_found("author not found"));
    }

    let errors = body.validate();
    if !errors.is_empty() {
        state.logger.warn(format!("update: incomplete data for id {id}"));
        return Err(AppError::validation(errors, "author payload failed validation"));
    }

    state
        .authors
        .update(&bookstore_db::Author::from(&body))
        .await
        .map_err(repo_error)?;

    state.logger.info(format!("update: successful with id {id}"));
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /{id} — gated to delete roles; a 409 surfaces when books still
/// reference the author.
async fn delete_author(
    State(state): State<AuthorsState>,
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

    if !state.authors.exists(id).await.map_err(repo_error)? {
        state.logger.warn(format!("delete: not found id {id}"));
        return Err(AppError::not_found("author not found"));
    }

    state.authors.delete(id).await.map_err(repo_error)?;

    state.logger.info(format!("delete: successful with id {id}"));
    Ok(StatusCode::NO_CONTENT)
}

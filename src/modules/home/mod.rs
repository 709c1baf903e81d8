use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use bookstore_kernel::{InitCtx, Module};
use bookstore_telemetry::Logger;

#[derive(Clone)]
struct HomeState {
    logger: Logger,
}

/// Diagnostic module: service metadata and a log-level exercise, kept from
/// the original deployment for smoke-testing a running instance.
pub struct HomeModule {
    state: HomeState,
}

/// Create a new instance of the home module.
pub fn create_module() -> Arc<dyn Module> {
    Arc::new(HomeModule {
        state: HomeState {
            logger: Logger::new("home"),
        },
    })
}

#[async_trait]
impl Module for HomeModule {
    fn name(&self) -> &'static str {
        "home"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "home module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/{id}", get(echo))
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "Service metadata",
                        "tags": ["Home"],
                        "responses": {
                            "200": { "description": "Service name and version" }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Echo a value",
                        "tags": ["Home"],
                        "responses": {
                            "200": { "description": "The echoed id" }
                        }
                    }
                }
            }
        }))
    }
}

/// GET / — service metadata.
async fn index(State(state): State<HomeState>) -> Json<serde_json::Value> {
    state.logger.info("accessed home controller");
    Json(serde_json::json!({
        "service": "bookstore-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /{id} — echo, exercising the non-info log levels.
async fn echo(State(state): State<HomeState>, Path(id): Path<i64>) -> Json<serde_json::Value> {
    state.logger.debug(format!("echo: got a value ({id})"));
    if id < 0 {
        state.logger.warn("echo: negative id supplied");
    }
    Json(serde_json::json!({ "id": id, "value": "value" }))
}

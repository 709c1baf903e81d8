use async_trait::async_trait;
use axum::Router;

/// Context provided to modules during initialization and startup.
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
}

/// Schema migration contributed by a module. The `up` script must be
/// idempotent (`IF NOT EXISTS` DDL) since it is replayed on every boot.
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// Core trait every bookstore module implements.
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module; routes mount under `/api/{name}`.
    fn name(&self) -> &'static str;

    /// Initialize the module with the provided context.
    /// Called during application startup before migrations.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Return the Axum router for this module's routes.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// Return OpenAPI specification fragment for this module as JSON.
    /// Merged with other modules' specs by the HTTP layer.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Return migrations contributed by this module, executed in order.
    fn migrations(&self) -> Vec<Migration> {
        vec![]
    }

    /// Start the module. Called after migrations are complete, so this is
    /// where seed data is ensured.
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Stop the module and clean up resources during shutdown.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

use anyhow::Context;

use bookstore_app::init_application;
use bookstore_db::Db;
use bookstore_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load bookstore settings")?;
    bookstore_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "bookstore bootstrap starting"
    );

    let db = Db::connect(&settings.database.url, settings.database.max_connections)
        .await
        .with_context(|| "failed to connect to the database")?;

    let registry = init_application(&settings, &db).await?;

    tracing::info!("bookstore bootstrap complete");

    bookstore_http::start_server(&registry, &settings).await?;

    registry.stop_modules().await?;
    Ok(())
}

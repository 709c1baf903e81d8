use anyhow::Context;
use clap::{Parser, Subcommand};

use bookstore_db::Db;
use bookstore_kernel::settings::Settings;

#[derive(Parser)]
#[command(name = "bookstore-cli", about = "Bookstore management API utility")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (the default when no subcommand is given).
    Serve,
    /// Apply migrations and ensure the demo roles/accounts, then exit.
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load bookstore settings")?;
    bookstore_telemetry::init(&settings.telemetry)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let db = connect(&settings).await?;
            let registry = bookstore_app::init_application(&settings, &db).await?;
            bookstore_http::start_server(&registry, &settings).await?;
            registry.stop_modules().await?;
        }
        Command::Seed => {
            // An explicit seed run always ensures the demo data, regardless
            // of the configured flag.
            settings.auth.seed_demo_data = true;
            let db = connect(&settings).await?;
            let registry = bookstore_app::init_application(&settings, &db).await?;
            registry.stop_modules().await?;
            tracing::info!("seed complete");
        }
    }

    Ok(())
}

async fn connect(settings: &Settings) -> anyhow::Result<Db> {
    Db::connect(&settings.database.url, settings.database.max_connections)
        .await
        .with_context(|| "failed to connect to the database")
}

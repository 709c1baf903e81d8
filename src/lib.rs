//! Bookstore application library.
//!
//! Hosts the entity modules (authors, books, users, home) and the bootstrap
//! sequence shared by the server binary, the CLI, and the integration tests.

pub mod modules;

use bookstore_db::Db;
use bookstore_kernel::settings::Settings;
use bookstore_kernel::{InitCtx, ModuleRegistry};

/// Build and start the application against an already-connected database:
/// register modules, initialize them, apply their migrations, then run the
/// start hooks (which ensure the seed data). Returns the live registry.
pub async fn init_application(settings: &Settings, db: &Db) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, db, settings);

    let ctx = InitCtx { settings };
    registry.init_modules(&ctx).await?;

    let migrations = registry.collect_migrations();
    db.apply_migrations(
        migrations
            .iter()
            .map(|(module, migration)| (module.as_str(), migration.id, migration.up)),
    )
    .await?;

    registry.start_modules(&ctx).await?;

    Ok(registry)
}

//! Creates the database if needed and applies the embedded schema migration.

use std::io;

use taskcat_shared::config::DatabaseSettings;
use taskcat_shared::db::migrations::{ensure_database_exists, run_migrations};
use taskcat_shared::db::pool::{close_pool, create_pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskcat_setup=warn,taskcat_shared=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let settings = DatabaseSettings::from_env()?;
    ensure_database_exists(&settings.url).await?;

    let pool = create_pool(settings.pool_config()).await?;
    let migrated = run_migrations(&pool).await;
    close_pool(pool).await;
    migrated?;

    println!("All tables have been successfully created.");
    Ok(())
}

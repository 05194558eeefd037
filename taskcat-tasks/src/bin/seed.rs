//! Fills the schema with generated users and tasks.

use std::io;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;
use taskcat_shared::config::{DatabaseSettings, SeedSettings};
use taskcat_shared::db::migrations::missing_tables;
use taskcat_shared::db::pool::{close_pool, create_pool};
use taskcat_shared::seed::seed_database;
use taskcat_shared::store::PgTaskRepository;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskcat_seed=info,taskcat_shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let settings = DatabaseSettings::from_env()?;
    let volume = SeedSettings::from_env()?;
    let pool = create_pool(settings.pool_config()).await?;

    let missing = missing_tables(&pool).await?;
    if !missing.is_empty() {
        close_pool(pool).await;
        anyhow::bail!(
            "missing tables: {}; run taskcat-setup first",
            missing.join(", ")
        );
    }

    let repo = PgTaskRepository::new(pool.clone());
    let mut rng = StdRng::from_entropy();
    let seeded = seed_database(&repo, &volume, &mut rng).await;
    close_pool(pool).await;

    let report = seeded.context("seeding failed")?;
    println!(
        "All seeds have been successfully inserted ({} users, {} tasks).",
        report.users, report.tasks
    );
    Ok(())
}

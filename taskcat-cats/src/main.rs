//! # taskcat Cats
//!
//! Interactive menu over a MongoDB collection of cat documents.
//!
//! ## Usage
//!
//! ```bash
//! export MONGODB_URI=mongodb://localhost:27017
//! export MONGODB_DATABASE=taskcat
//! cargo run -p taskcat-cats
//! ```

use std::io::{self, IsTerminal};

use taskcat_shared::config::MongoSettings;
use taskcat_shared::menu;
use taskcat_shared::ops::{CatOps, CAT_MENU};
use taskcat_shared::render::Presenter;
use taskcat_shared::store::MongoCatStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskcat_cats=warn,taskcat_shared=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    tracing::info!("taskcat-cats v{} starting", env!("CARGO_PKG_VERSION"));

    let settings = MongoSettings::from_env()?;
    let store = MongoCatStore::connect(&settings).await?;
    let ops = CatOps::new(store);
    let presenter = Presenter::new(io::stdout().is_terminal());

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();
    menu::run(&CAT_MENU, &ops, presenter, &mut input, &mut output).await?;

    Ok(())
}

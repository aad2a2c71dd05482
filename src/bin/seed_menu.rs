//! Seed binary - writes a multilingual menu into the configured store
//!
//! Usage:
//!   cargo run --bin seed                      # Bundled sample menu
//!   cargo run --bin seed -- path/to/menu.json # Menu from a JSON file
//!
//! Optional environment variables:
//! - DATABASE_URL (without it the seed goes to a throwaway in-memory store,
//!   which is only useful for checking that a menu file parses)
//!
//! Refuses to run when the store already holds menu items.

use anyhow::{Context, Result};
use menu_service::{admin::MenuAdmin, seed, store};
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("menu_service=info".parse()?),
        )
        .init();

    let menu = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            info!("Loading menu from {}", path.display());
            seed::load_menu_file(&path)?
        }
        None => seed::sample_menu()?,
    };

    let database_url = std::env::var("DATABASE_URL").ok();
    let store = store::open(database_url.as_deref())
        .await
        .context("Failed to open menu store")?;

    let report = seed::seed_store(&MenuAdmin::new(store), &menu)
        .await
        .context("Seeding failed")?;

    println!(
        "Seeded {} categories and {} items",
        report.categories, report.items
    );
    Ok(())
}

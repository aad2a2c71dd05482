use anyhow::{Context, Result};
use menu_service::{config::Config, scheduler, seed, server, store};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("menu_service=info".parse()?),
        )
        .init();

    info!("Starting menu service");

    // Load configuration from environment
    let config = Config::from_env()?;

    let store = store::open(config.database_url.as_deref())
        .await
        .context("Failed to open menu store")?;

    let state = server::AppState::new(config.clone(), store);

    if config.seed_on_start {
        match seed::seed_store(&state.admin, &seed::sample_menu()?).await {
            Ok(report) => info!("Seeded sample menu ({} items)", report.items),
            Err(e) => warn!("Skipping seed: {}", e),
        }
    }

    // First projection before accepting traffic; the poller keeps retrying
    if let Err(e) = state.snapshot.refresh().await {
        warn!("Initial menu load failed: {}", e);
    }

    let mut poller = scheduler::start_poller(state.snapshot.clone(), config.poll_interval).await?;

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    server::serve(listener, state).await?;

    poller.shutdown().await?;
    Ok(())
}

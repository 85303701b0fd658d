//! Tenet property server binary.

use std::sync::Arc;

use anyhow::Context;
use tenet_server::{AppState, Settings, metrics::init_metrics, run_server};
use tenet_store::{PropertyResolver, SqliteResolver};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load().context("failed to load settings")?;
    let addr = settings
        .socket_addr()
        .context("invalid host/port in settings")?;
    let store_config = settings
        .store_config()
        .map_err(anyhow::Error::msg)
        .context("invalid cache settings")?;

    tracing::info!("Starting Tenet server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(database = %settings.database_path.display(), "Opening property store");

    let resolver = SqliteResolver::new(&settings.database_path);
    resolver
        .initialize()
        .context("failed to initialize property store")?;

    let prometheus = init_metrics().context("failed to install metrics recorder")?;

    let state = AppState::from_resolver(Arc::new(resolver) as Arc<dyn PropertyResolver>, store_config);

    run_server(addr, state, prometheus).await?;

    Ok(())
}

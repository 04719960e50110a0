//! Binary entry point: load configuration, wire up state, serve.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use storecredit::auth::MemoryStore;
use storecredit::server::{self, AppState};
use storecredit::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; the environment always wins
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    info!(
        bind_addr = %config.bind_addr(),
        api_version = %config.api_version(),
        "starting storecredit"
    );

    let state = AppState::new(config, Arc::new(MemoryStore::new()));
    server::run(state).await.context("server error")?;

    Ok(())
}

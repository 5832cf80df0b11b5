//! Hare and Hounds Web API
//!
//! Serves matches over REST under `/hareandhounds/api/games`. Match state
//! lives in memory by default, or in SQLite when `--database` is given.

mod config;
mod error;
mod memory;
mod routes;
mod sqlite;
mod store;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::routes::{router, AppState, AppStateInner};
use crate::store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_filter)?)
        .init();

    let store = Store::open(config.database.as_deref()).context("failed to open match store")?;
    match &config.database {
        Some(path) => info!(path = %path.display(), "using sqlite match store"),
        None => info!("no database configured - matches are kept in memory"),
    }

    let state: AppState = Arc::new(AppStateInner { store });
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(addr = %config.bind, "Hare and Hounds API running");
    axum::serve(listener, app).await?;
    Ok(())
}

mod config;
mod database;
mod dispatch;
mod error;
mod indexer;
mod reader;
mod stats;
mod types;

use config::Config;
use database::Store;
use indexer::index_stream;
use tokio::io::BufReader;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr; stdin is the data channel
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run());
    // A stdin read may still be parked on a blocking thread after an interrupt
    runtime.shutdown_background();
    result
}

async fn run() -> anyhow::Result<()> {
    info!(
        git_hash = option_env!("VOTE_INGEST_BUILD_GIT_HASH").unwrap_or("unknown"),
        "Starting vote ingest"
    );

    let config = Config::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;
    let url = config.database.connection_url()?;

    info!("Connecting to {}", config.database.redacted_url());
    let mut store = Store::connect(&url).await.map_err(|e| {
        error!("Database connection failed: {}", e);
        e
    })?;

    if config.bootstrap_schema {
        if let Err(e) = store.bootstrap_schema().await {
            error!("Schema bootstrap failed: {:#}", e);
            if let Err(close_err) = store.close().await {
                warn!("Failed to close database connection cleanly: {}", close_err);
            }
            return Err(e);
        }
    }

    let input = BufReader::new(tokio::io::stdin());
    let stats = index_stream(input, store.connection(), shutdown_signal()).await;
    stats.log_summary();

    if let Err(e) = store.close().await {
        warn!("Failed to close database connection cleanly: {}", e);
    }
    info!("Vote ingest stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

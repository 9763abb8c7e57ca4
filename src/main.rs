use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bucketlist_api::config::{AppConfig, Args};
use bucketlist_api::database::DatabaseManager;
use bucketlist_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bucketlist_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let config = AppConfig::from_env()?.with_args(args);
    tracing::info!("Starting Bucketlist API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to open database")?;

    let bind_addr = config.addr();
    let state = AppState::new(config, pool);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Bucketlist API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}

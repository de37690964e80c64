//! Yardline Server — Application entry point.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use yardline_db::DbManager;
use yardline_server::{AppState, ServerConfig, router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("yardline=info,tower_http=info")),
        )
        .json()
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "Yardline server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    info!(bind_addr = %config.bind_addr, "Starting Yardline server");

    let db = DbManager::connect(&config.db).await?;
    let state = Arc::new(AppState::new(db.client().clone(), &config));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(bind_addr = %config.bind_addr, "Listening");
    axum::serve(listener, router(state)).await?;

    info!("Yardline server stopped");
    Ok(())
}

use anyhow::Context;

use comments_api::config::AppConfig;
use comments_api::database::DatabaseManager;
use comments_api::{app, init_tracing, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting comments API in {:?} mode", config.environment);
    if config.uses_dev_secret() {
        tracing::warn!("JWT_SECRET not set; using the development secret");
    }

    let repository = DatabaseManager::open_repository(&config.database)
        .await
        .context("failed to open comment store")?;

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Comments API listening on http://{}", bind_addr);

    axum::serve(listener, app(AppState::new(repository, config)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

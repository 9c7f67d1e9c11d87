use std::sync::Arc;

use anyhow::Context;
use common::storage::filesystem::FilesystemImageStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use petpal_server::config::AppConfig;
use petpal_server::database::init_db;
use petpal_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    info!("Database ready");

    let images = FilesystemImageStore::new(
        config.storage.upload_dir.clone(),
        config.storage.max_image_size,
    )
    .await
    .context("Failed to prepare upload directory")?;
    info!(dir = %config.storage.upload_dir.display(), "Image store ready");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db,
        config: Arc::new(config),
        images: Arc::new(images),
    };

    let app = petpal_server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}

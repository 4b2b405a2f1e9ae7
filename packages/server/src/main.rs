use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use library_server::config::AppConfig;
use library_server::state::AppState;
use library_server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = database::init_db(&config.database)
        .await
        .context("Failed to connect to database")?;
    seed::ensure_indexes(&db).await;

    if config.seed.enabled {
        seed::seed_taxonomy(&db)
            .await
            .context("Failed to seed course taxonomy")?;
    }

    let blob_sink = common::storage::connect(&config.storage)
        .await
        .context("Failed to initialize blob storage")?;
    info!(backend = ?config.storage.backend, "Blob storage ready");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_router(AppState {
        db,
        blob_sink,
        config,
    });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

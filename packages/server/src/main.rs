use std::sync::Arc;

use anyhow::Context;
use catalog_common::storage::FilesystemBlobStore;
use catalog_server::config::AppConfig;
use catalog_server::services::sub_category::SeaOrmSubCategoryService;
use catalog_server::state::AppState;
use catalog_server::{build_router, database, seed};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info,sea_orm=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = database::init_db(&config.database)
        .await
        .context("Failed to connect to database")?;
    seed::seed_role_permissions(&db)
        .await
        .context("Failed to seed roles")?;
    seed::ensure_indexes(&db)
        .await
        .context("Failed to create indexes")?;
    if let Some(admin) = &config.auth.bootstrap_admin {
        seed::ensure_bootstrap_admin(&db, admin).await?;
    }

    let blob_store = FilesystemBlobStore::from_config(&config.storage)
        .await
        .context("Failed to initialize image storage")?;
    info!(
        base_path = %blob_store.base_path().display(),
        max_blob_size = config.storage.max_blob_size,
        "Image storage ready"
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        sub_categories: Arc::new(SeaOrmSubCategoryService::new(db.clone())),
        blob_store: Arc::new(blob_store),
        db,
        config,
    };
    let app = build_router(state);

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
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

//! Main entry point for the filebin server binary

use anyhow::Result;
use filebin_core::{
    create_app, get_database_pool, run_migrations, run_server, AppConfig, AppState,
    BlobRepository, DatabaseManager, DiskBlobStore, DiskBlobStoreConfig, UploadService,
    UploadedFileRepository,
};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    info!("Configuration loaded successfully");
    info!("Server will bind to: {}", config.bind_address());
    info!("Database URL: {}", config.database.url);

    config
        .create_directories()
        .map_err(|e| anyhow::anyhow!("Failed to create directories: {}", e))?;

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?;

    let pool = get_database_pool(&config.database.url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create database pool: {}", e))?;

    if config.database.migrate_on_start {
        run_migrations(pool.clone())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to run database migrations: {}", e))?;
    }

    let db_manager = DatabaseManager::new(pool.clone());

    let store_config = DiskBlobStoreConfig {
        root: config.storage.root.clone(),
        fan_out: config.storage.fan_out,
    };
    let blob_store = DiskBlobStore::new(store_config, BlobRepository::new(pool.clone()));
    blob_store
        .initialize()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize blob store: {}", e))?;
    info!("Blob store initialized at {}", config.storage.root.display());

    let upload_service = UploadService::new(blob_store, UploadedFileRepository::new(pool));

    let state = AppState::new(db_manager, upload_service);
    info!("App: {} v{}", state.app_name, state.version);

    let app = create_app(state);

    run_server(app, addr).await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let default_level = if cfg!(debug_assertions) { "debug" } else { "info" };

        format!(
            "{}={},tower_http=debug,axum=debug",
            env!("CARGO_CRATE_NAME").replace('-', "_"),
            default_level
        )
        .into()
    });

    let fmt_layer = fmt::layer().with_target(true).with_file(true).with_line_number(true);

    let is_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    if is_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.pretty())
            .init();
    }
}

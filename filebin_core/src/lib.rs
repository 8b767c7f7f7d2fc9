//! Core library for the filebin upload service: storage, entity access,
//! presentation helpers, and the HTTP surface.

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod presenter;
pub mod storage;
pub mod uploads;

pub use config::AppConfig;
pub use database::{get_database_pool, run_migrations, DatabaseManager};
pub use error::{AppError, Result};
pub use handlers::routes::create_routes;
pub use handlers::{Breadcrumb, Breadcrumbs};
pub use storage::{Blob, BlobRepository, DiskBlobStore, DiskBlobStoreConfig};
pub use uploads::{SubmittedFile, UploadService, UploadedFile, UploadedFileRepository};

use axum::Router;
use std::net::SocketAddr;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub db_manager: DatabaseManager,
    pub upload_service: UploadService,
}

impl AppState {
    pub fn new(db_manager: DatabaseManager, upload_service: UploadService) -> Self {
        Self {
            app_name: "Filebin".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            db_manager,
            upload_service,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes())
        .layer(CorsLayer::permissive())
        .layer(middleware::logging_layer())
        .with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}

//! Route table for the uploaded-files service

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};

use crate::{models::ApiResponse, AppState};

use super::uploads;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route(
            "/uploaded_files",
            get(uploads::list_uploaded_files).post(uploads::create_uploaded_file),
        )
        .route("/uploaded_files/new", get(uploads::new_uploaded_file))
        .route("/uploaded_files/:id", get(uploads::show_uploaded_file))
        .route("/uploaded_files/:id/blob", get(uploads::serve_blob))
}

async fn handle_root(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(serde_json::json!({
        "app": state.app_name,
        "version": state.version,
        "endpoints": {
            "health": "/health",
            "uploaded_files": "/uploaded_files",
            "uploaded_file": "/uploaded_files/{id}",
            "new_uploaded_file": "/uploaded_files/new",
            "blob": "/uploaded_files/{id}/blob"
        }
    })))
}

async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let database = match state.db_manager.health_check().await {
        Ok(()) => "healthy",
        Err(_) => "unhealthy",
    };

    Json(ApiResponse::success(serde_json::json!({
        "status": "healthy",
        "database": database,
        "timestamp": chrono::Utc::now().timestamp(),
    })))
}

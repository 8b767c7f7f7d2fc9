//! Handlers for the uploaded-files resource: list, show, new, create, and
//! raw blob serving.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::{
    error::{AppError, Result},
    models::ApiResponse,
    presenter,
    uploads::{SubmittedFile, UploadedFile},
    AppState,
};

use super::breadcrumbs::Breadcrumbs;

#[derive(Debug, Serialize)]
pub struct UploadedFileView {
    pub id: i64,
    pub filename: String,
    pub content_type: String,
    pub byte_size: u64,
    pub created_at: String,
    pub image: bool,
    pub pdf: bool,
    pub blob_url: String,
}

impl UploadedFileView {
    fn from_record(file: &UploadedFile) -> Result<Self> {
        Ok(Self {
            id: file.id,
            filename: presenter::filename(file)?.to_string(),
            content_type: presenter::content_type(file)?.to_string(),
            byte_size: file.blob.as_ref().map(|b| b.byte_size).unwrap_or(0),
            created_at: file.created_at.to_rfc3339(),
            image: presenter::is_image(file),
            pdf: presenter::is_pdf(file),
            blob_url: format!("/uploaded_files/{}/blob", file.id),
        })
    }
}

pub async fn list_uploaded_files(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let files = state.upload_service.list().await?;

    let mut views = Vec::with_capacity(files.len());
    for file in &files {
        views.push(UploadedFileView::from_record(file)?);
    }

    Ok(Json(ApiResponse::success(json!({
        "files": views,
        "count": presenter::file_count(&files),
    }))))
}

pub async fn show_uploaded_file(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let file = state.upload_service.find(id).await?;

    let mut breadcrumbs = Breadcrumbs::for_uploads();
    breadcrumbs.push(presenter::filename(&file)?, None);

    let view = UploadedFileView::from_record(&file)?;

    Ok(Json(ApiResponse::success(json!({
        "file": view,
        "breadcrumbs": breadcrumbs,
    }))))
}

pub async fn new_uploaded_file() -> Json<ApiResponse<serde_json::Value>> {
    let mut breadcrumbs = Breadcrumbs::for_uploads();
    breadcrumbs.push("Upload File", None);

    // Empty form scaffold: the unsaved-record placeholder of the submission
    // form, with the single permitted field.
    Json(ApiResponse::success(json!({
        "uploaded_file": { "file": null },
        "breadcrumbs": breadcrumbs,
    })))
}

pub async fn create_uploaded_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response> {
    let mut submitted: Option<SubmittedFile> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::Validation(format!("Failed to read multipart field: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();

        // `file` is the only permitted part; everything else is dropped.
        if name != "file" && name != "uploaded_file[file]" {
            tracing::debug!(field = %name, "discarding unpermitted multipart field");
            continue;
        }

        let filename = field
            .file_name()
            .ok_or_else(|| AppError::Validation("Missing filename".to_string()))?
            .to_string();

        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| mime_guess::from_path(&filename).first_or_octet_stream().to_string());

        let data = field.bytes().await.map_err(|e| {
            AppError::Validation(format!("Failed to read file data: {}", e))
        })?;

        submitted = Some(SubmittedFile {
            filename,
            content_type,
            data: data.to_vec(),
        });
        break;
    }

    let submitted =
        submitted.ok_or_else(|| AppError::Validation("No file submitted".to_string()))?;

    let record = state.upload_service.create_from_submitted(submitted).await?;

    Ok(Redirect::to(&format!("/uploaded_files/{}", record.id)).into_response())
}

pub async fn serve_blob(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response> {
    let (blob, data) = state.upload_service.blob_bytes(id).await?;

    let mut headers = HeaderMap::new();

    headers.insert(
        header::CONTENT_TYPE,
        blob.content_type.parse().unwrap_or_else(|_| {
            header::HeaderValue::from_static("application/octet-stream")
        }),
    );

    headers.insert(header::CONTENT_LENGTH, header::HeaderValue::from(data.len() as u64));

    Ok((StatusCode::OK, headers, data).into_response())
}

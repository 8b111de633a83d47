//! File handlers for the HTTP API.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;

use crate::web::dto::{FileResponse, OperationStatus, UploadForm};
use crate::web::error::{ApiError, ErrorBody};
use crate::web::handlers::AppState;

/// POST /api/files/{username} - Upload a file.
///
/// Request body: multipart/form-data with a `file` field. The filename may
/// be percent-encoded and is decoded before it is stored.
#[utoipa::path(
    post,
    path = "/api/files/{username}",
    tag = "files",
    params(
        ("username" = String, Path, description = "Owner's username")
    ),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File accepted", body = OperationStatus),
        (status = 400, description = "Malformed upload", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 413, description = "File size or quota exceeded", body = ErrorBody)
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<OperationStatus>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("Failed to read multipart field: {}", e);
        ApiError::bad_request("Invalid multipart data")
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(|name| name.to_string())
            .ok_or_else(|| ApiError::bad_request("File field must have a filename"))?;

        let record = state
            .file_service()
            .upload(&username, &file_name, field)
            .await?;

        return Ok(Json(OperationStatus::uploaded(&record)));
    }

    Err(ApiError::bad_request("No file provided"))
}

/// GET /api/files/{username} - List a user's files.
#[utoipa::path(
    get,
    path = "/api/files/{username}",
    tag = "files",
    params(
        ("username" = String, Path, description = "Owner's username")
    ),
    responses(
        (status = 200, description = "Files, newest first", body = Vec<FileResponse>),
        (status = 404, description = "User not found", body = ErrorBody)
    )
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<Vec<FileResponse>>, ApiError> {
    let files = state.file_service().list(&username).await?;

    Ok(Json(files.into_iter().map(FileResponse::from).collect()))
}

/// GET /api/files/{username}/{file_id} - Get file metadata.
#[utoipa::path(
    get,
    path = "/api/files/{username}/{file_id}",
    tag = "files",
    params(
        ("username" = String, Path, description = "Owner's username"),
        ("file_id" = String, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File metadata", body = FileResponse),
        (status = 404, description = "File not found", body = ErrorBody)
    )
)]
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    Path((username, file_id)): Path<(String, String)>,
) -> Result<Json<FileResponse>, ApiError> {
    let record = state.file_service().get(&username, &file_id).await?;

    Ok(Json(record.into()))
}

/// DELETE /api/files/{username}/{file_id} - Delete a file.
///
/// The metadata is removed immediately; the bytes are removed in the
/// background.
#[utoipa::path(
    delete,
    path = "/api/files/{username}/{file_id}",
    tag = "files",
    params(
        ("username" = String, Path, description = "Owner's username"),
        ("file_id" = String, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File deleted", body = OperationStatus),
        (status = 404, description = "File not found", body = ErrorBody)
    )
)]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path((username, file_id)): Path<(String, String)>,
) -> Result<Json<OperationStatus>, ApiError> {
    let record = state.file_service().delete(&username, &file_id).await?;

    Ok(Json(OperationStatus::deleted(&record)))
}

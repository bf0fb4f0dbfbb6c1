//! File Upload Handlers
//!
//! Work-dir backed object storage: upload returns a public URL under
//! `/uploads/{name}`, delete removes the object. Stored names are
//! server-generated UUIDs; client filenames never touch the filesystem.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
};
use serde::Serialize;
use uuid::Uuid;

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// Maximum file size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub original_name: String,
    pub size: usize,
    pub url: String,
}

/// Reject names that could escape the uploads directory
fn validate_object_name(name: &str) -> AppResult<()> {
    if name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
    {
        return Err(AppError::validation(format!("Invalid object name: {}", name)));
    }
    Ok(())
}

/// POST /api/uploads - 上传文件
pub async fn upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let uploads_dir = state.config.uploads_dir();
    std::fs::create_dir_all(&uploads_dir)
        .map_err(|e| AppError::internal(format!("Failed to create uploads directory: {}", e)))?;

    // Find the file field
    let mut field_data: Option<Vec<u8>> = None;
    let mut original_filename = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(|s| s.to_string());
        if name.as_deref() == Some("file") || name.as_deref() == Some("") {
            original_filename = field.file_name().map(|s| s.to_string());
            field_data = Some(field.bytes().await?.to_vec());
            break;
        }
    }

    let data = field_data.ok_or_else(|| {
        AppError::validation("No 'file' field found. Field name must be 'file'".to_string())
    })?;
    let original_name = original_filename
        .ok_or_else(|| AppError::validation("No filename provided in file field".to_string()))?;

    if data.is_empty() {
        return Err(AppError::validation("Empty file provided".to_string()));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "File too large. Maximum size is {}MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    // Server-generated name, original extension kept for mime guessing
    let ext = std::path::Path::new(&original_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("bin")
        .to_lowercase();
    let filename = format!("{}.{}", Uuid::new_v4(), ext);
    let file_path = uploads_dir.join(&filename);

    std::fs::write(&file_path, &data)
        .map_err(|e| AppError::internal(format!("Failed to save file: {}", e)))?;

    tracing::info!(
        original_name = %original_name,
        filename = %filename,
        size = data.len(),
        "File uploaded"
    );

    let url = format!("/uploads/{}", filename);
    Ok(Json(UploadResponse {
        filename,
        original_name,
        size: data.len(),
        url,
    }))
}

/// GET /uploads/:name - 公开访问已上传文件
pub async fn serve(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    validate_object_name(&name)?;

    let file_path = state.config.uploads_dir().join(&name);
    let data = tokio::fs::read(&file_path)
        .await
        .map_err(|_| AppError::not_found(format!("Object {}", name)))?;

    let mime = mime_guess::from_path(&file_path)
        .first_or_octet_stream()
        .to_string();

    Ok(([(header::CONTENT_TYPE, mime)], data))
}

/// DELETE /api/uploads/:name - 删除已上传文件
pub async fn remove(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> AppResult<Json<bool>> {
    validate_object_name(&name)?;

    let file_path = state.config.uploads_dir().join(&name);
    if !file_path.exists() {
        return Err(AppError::not_found(format!("Object {}", name)));
    }
    std::fs::remove_file(&file_path)
        .map_err(|e| AppError::internal(format!("Failed to delete file: {}", e)))?;

    tracing::info!(filename = %name, "File deleted");
    Ok(Json(true))
}

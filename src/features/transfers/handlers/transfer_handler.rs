use axum::{
    body::{Body, Bytes},
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::debug;
use validator::Validate;

use crate::core::error::AppError;
use crate::core::extractor::RequesterTag;
use crate::features::transfers::dtos::{
    DeleteSessionResponseDto, SessionStatusDto, UploadFileDto, UploadFormDto, UploadResponseDto,
};
use crate::features::transfers::services::TransferService;
use crate::shared::types::ApiResponse;
use crate::shared::validation::{attachment_disposition, base_name};

/// Allocate a new key
///
/// Returns the key as plain text. The key and anything uploaded to it
/// expire after the configured lifetime.
#[utoipa::path(
    post,
    path = "/api/allocate",
    tag = "transfers",
    responses(
        (status = 201, description = "Key allocated", body = String, content_type = "text/plain"),
        (status = 503, description = "No free keys available")
    )
)]
pub async fn allocate_key(
    RequesterTag(tag): RequesterTag,
    State(service): State<Arc<TransferService>>,
) -> Result<(StatusCode, String), AppError> {
    let code = service.allocate(&tag).await?;
    Ok((StatusCode::CREATED, code))
}

/// Upload a file to a key
///
/// Accepts multipart/form-data with:
/// - `key`: A key returned by the allocate endpoint (required)
/// - `file`: The file to send (required)
///
/// Uploading again to the same key replaces the previous file.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "transfers",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "Upload form with the key and the file",
    ),
    responses(
        (status = 201, description = "File uploaded successfully", body = ApiResponse<UploadResponseDto>),
        (status = 400, description = "File rejected or malformed request"),
        (status = 404, description = "Unknown or expired key")
    )
)]
pub async fn upload_file(
    State(service): State<Arc<TransferService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UploadResponseDto>>), AppError> {
    let mut key: Option<String> = None;
    let mut file: Option<(Bytes, String, String)> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "key" => {
                let text = field.text().await.map_err(multipart_error)?;
                key = Some(text.trim().to_string());
            }
            "file" => {
                let file_name = field
                    .file_name()
                    .map(|name| base_name(name).to_string())
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| AppError::BadRequest("Filename is required".to_string()))?;

                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                service.check_file(&file_name, &content_type)?;

                // Enforce the ceiling while streaming instead of after buffering
                let mut data = Vec::new();
                while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
                    service.check_size(data.len() + chunk.len())?;
                    data.extend_from_slice(&chunk);
                }

                file = Some((Bytes::from(data), file_name, content_type));
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let form = UploadFormDto {
        key: key.unwrap_or_default(),
    };
    form.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (data, file_name, content_type) =
        file.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;

    let response = service
        .upload(&form.key, data, &file_name, &content_type)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(response), None)),
    ))
}

/// Download the file bound to a key
#[utoipa::path(
    get,
    path = "/api/download/{code}",
    tag = "transfers",
    params(
        ("code" = String, Path, description = "Key the file was uploaded to")
    ),
    responses(
        (status = 200, description = "File content with its original name and media type"),
        (status = 404, description = "Unknown or expired key, or no file uploaded yet")
    )
)]
pub async fn download_file(
    State(service): State<Arc<TransferService>>,
    Path(code): Path<String>,
) -> Result<Response, AppError> {
    let blob = service.download(&code).await?;

    let content_type = HeaderValue::from_str(&blob.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let disposition = HeaderValue::from_str(&attachment_disposition(&blob.original_name))
        .map_err(|e| AppError::Internal(format!("Invalid Content-Disposition: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from(blob.bytes),
    )
        .into_response())
}

/// Get the status of a key
///
/// Lets the sender poll whether the key is still alive and what file,
/// if any, is bound to it.
#[utoipa::path(
    get,
    path = "/api/sessions/{code}",
    tag = "transfers",
    params(
        ("code" = String, Path, description = "Key to inspect")
    ),
    responses(
        (status = 200, description = "Key is alive", body = ApiResponse<SessionStatusDto>),
        (status = 404, description = "Unknown or expired key")
    )
)]
pub async fn get_session_status(
    State(service): State<Arc<TransferService>>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<SessionStatusDto>>, AppError> {
    let status = service.status(&code).await?;
    Ok(Json(ApiResponse::success(Some(status), None)))
}

/// Delete a key and its file before it expires
#[utoipa::path(
    delete,
    path = "/api/sessions/{code}",
    tag = "transfers",
    params(
        ("code" = String, Path, description = "Key to delete")
    ),
    responses(
        (status = 200, description = "Key deleted", body = ApiResponse<DeleteSessionResponseDto>),
        (status = 404, description = "Unknown or expired key")
    )
)]
pub async fn delete_session(
    State(service): State<Arc<TransferService>>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<DeleteSessionResponseDto>>, AppError> {
    service.delete(&code).await?;

    Ok(Json(ApiResponse::success(
        Some(DeleteSessionResponseDto { deleted: true }),
        Some("Key deleted successfully".to_string()),
    )))
}

fn multipart_error(e: MultipartError) -> AppError {
    debug!("Failed to read multipart data: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Rejected("File too large".to_string())
    } else {
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::sessions::Session;
use crate::modules::storage::BlobRef;

/// Upload request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// Key obtained from the allocate endpoint
    #[schema(example = "K7MX")]
    pub key: String,
    /// The file to send
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Text fields of the upload form, validated once the multipart body is read
#[derive(Debug, Deserialize, Validate)]
pub struct UploadFormDto {
    #[validate(length(min = 1, message = "key is required"))]
    pub key: String,
}

/// Metadata of the file bound to a key
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileInfoDto {
    /// Original filename as uploaded
    pub name: String,
    /// Media type declared by the uploader
    pub content_type: String,
    /// Size in bytes
    pub size: u64,
}

impl From<&BlobRef> for FileInfoDto {
    fn from(file: &BlobRef) -> Self {
        Self {
            name: file.original_name.clone(),
            content_type: file.content_type.clone(),
            size: file.size as u64,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponseDto {
    pub key: String,
    pub file: FileInfoDto,
    /// When the key and its file are removed
    pub expires_at: DateTime<Utc>,
}

/// Current state of a key, bound or not
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionStatusDto {
    pub key: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Absent until a file is uploaded
    pub file: Option<FileInfoDto>,
}

impl From<&Session> for SessionStatusDto {
    fn from(session: &Session) -> Self {
        Self {
            key: session.code.clone(),
            created_at: session.created_at,
            expires_at: session.expires_at,
            file: session.file.as_ref().map(FileInfoDto::from),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteSessionResponseDto {
    pub deleted: bool,
}

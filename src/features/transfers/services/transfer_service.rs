use axum::body::Bytes;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::config::UploadConfig;
use crate::core::error::{AppError, Result};
use crate::features::sessions::SessionRegistry;
use crate::features::transfers::dtos::{FileInfoDto, SessionStatusDto, UploadResponseDto};
use crate::modules::storage::{Blob, BlobStore};
use crate::shared::validation::file_extension;

/// Glue between the HTTP layer, the session registry and blob storage.
///
/// Owns the upload policy: every check that can reject a file runs before
/// anything is written to storage.
pub struct TransferService {
    registry: Arc<SessionRegistry>,
    blob_store: Arc<dyn BlobStore>,
    upload: UploadConfig,
}

impl TransferService {
    pub fn new(
        registry: Arc<SessionRegistry>,
        blob_store: Arc<dyn BlobStore>,
        upload: UploadConfig,
    ) -> Self {
        Self {
            registry,
            blob_store,
            upload,
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.upload.max_file_size
    }

    /// Mint a fresh key for `requester_tag`
    pub async fn allocate(&self, requester_tag: &str) -> Result<String> {
        Ok(self.registry.allocate(requester_tag).await?)
    }

    /// Reject names and media types outside the allow-lists
    pub fn check_file(&self, file_name: &str, content_type: &str) -> Result<()> {
        let extension = file_extension(file_name).ok_or_else(|| {
            AppError::Rejected(format!("File '{}' has no extension", file_name))
        })?;
        if !self.upload.allowed_extensions.contains(&extension) {
            return Err(AppError::Rejected(format!(
                "Extension '{}' is not allowed. Allowed extensions: {}",
                extension,
                self.upload.allowed_extensions.join(", ")
            )));
        }

        let essence = media_type_essence(content_type);
        if !self.upload.allowed_mime_types.contains(&essence) {
            return Err(AppError::Rejected(format!(
                "File type '{}' is not allowed. Allowed types: {}",
                content_type,
                self.upload.allowed_mime_types.join(", ")
            )));
        }

        Ok(())
    }

    pub fn check_size(&self, size: usize) -> Result<()> {
        if size > self.upload.max_file_size {
            return Err(AppError::Rejected(format!(
                "File too large. Maximum size is {} bytes ({} MB)",
                self.upload.max_file_size,
                self.upload.max_file_size / 1024 / 1024
            )));
        }
        Ok(())
    }

    /// Reject keys that are unknown or expired
    async fn ensure_live(&self, code: &str) -> Result<()> {
        self.registry.lookup(code).await?;
        Ok(())
    }

    /// Store a file and bind it to `code`, replacing any earlier file
    pub async fn upload(
        &self,
        code: &str,
        data: Bytes,
        file_name: &str,
        content_type: &str,
    ) -> Result<UploadResponseDto> {
        self.check_file(file_name, content_type)?;
        self.check_size(data.len())?;
        self.ensure_live(code).await?;

        let file = self.blob_store.put(data, file_name, content_type).await?;
        debug!("Upload stored: blob={}, name={}", file.id, file.original_name);

        let session = match self.registry.bind(code, file.clone()).await {
            Ok(session) => session,
            Err(e) => {
                // Key expired between the liveness check and the bind
                if let Err(cleanup) = self.blob_store.delete(file.id).await {
                    warn!("Failed to delete orphaned blob {}: {}", file.id, cleanup);
                }
                return Err(e.into());
            }
        };

        info!(
            "File uploaded: code={}, name={}, size={}",
            session.code, file.original_name, file.size
        );

        Ok(UploadResponseDto {
            key: session.code,
            file: FileInfoDto::from(&file),
            expires_at: session.expires_at,
        })
    }

    /// The file currently bound to `code`
    pub async fn download(&self, code: &str) -> Result<Blob> {
        let session = self.registry.resolve(code).await?;
        let file = session
            .file
            .ok_or_else(|| AppError::NotFound("Unknown or expired key".to_string()))?;

        // A concurrent rebind may have released this blob already
        let blob = self.blob_store.get(file.id).await?;
        debug!("Download: code={}, blob={}", session.code, blob.id);

        Ok(blob)
    }

    pub async fn status(&self, code: &str) -> Result<SessionStatusDto> {
        let session = self.registry.lookup(code).await?;
        Ok(SessionStatusDto::from(&session))
    }

    pub async fn delete(&self, code: &str) -> Result<()> {
        self.registry.remove(code).await?;
        Ok(())
    }
}

/// "Text/Plain; charset=utf-8" -> "text/plain"
fn media_type_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{test_service, test_service_with};

    #[test]
    fn test_media_type_essence() {
        assert_eq!(media_type_essence("Text/Plain; charset=utf-8"), "text/plain");
        assert_eq!(media_type_essence("application/pdf"), "application/pdf");
    }

    #[tokio::test]
    async fn test_check_file_accepts_allowed_pairs() {
        let (service, _store) = test_service();
        tokio_test::assert_ok!(service.check_file("book.epub", "application/epub+zip"));
        tokio_test::assert_ok!(
            service.check_file("Comic.CBR", "application/vnd.comicbook-rar")
        );
        tokio_test::assert_ok!(
            service.check_file("notes.txt", "text/plain; charset=utf-8")
        );
    }

    #[tokio::test]
    async fn test_check_file_rejects_extension_and_type() {
        let (service, _store) = test_service();
        assert!(matches!(
            service.check_file("virus.exe", "application/pdf"),
            Err(AppError::Rejected(_))
        ));
        assert!(matches!(
            service.check_file("README", "text/plain"),
            Err(AppError::Rejected(_))
        ));
        assert!(matches!(
            service.check_file("book.pdf", "application/x-msdownload"),
            Err(AppError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn test_upload_rejects_oversize_before_storing() {
        let upload = UploadConfig {
            max_file_size: 4,
            ..UploadConfig::default()
        };
        let (service, store) = test_service_with(upload);
        let code = service.allocate("test").await.unwrap();

        let result = service
            .upload(&code, Bytes::from_static(b"12345"), "a.txt", "text/plain")
            .await;

        assert!(matches!(result, Err(AppError::Rejected(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_upload_to_unknown_key_stores_nothing() {
        let (service, store) = test_service();

        let result = service
            .upload("ZZZZ", Bytes::from_static(b"hi"), "a.txt", "text/plain")
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_upload_then_download_and_replace() {
        let (service, store) = test_service();
        let code = service.allocate("test").await.unwrap();

        let first = service
            .upload(
                &code,
                Bytes::from_static(b"0123456789"),
                "book.epub",
                "application/epub+zip",
            )
            .await
            .unwrap();
        assert_eq!(first.key, code);
        assert_eq!(first.file.size, 10);

        let blob = service.download(&code).await.unwrap();
        assert_eq!(&blob.bytes[..], b"0123456789");
        assert_eq!(blob.original_name, "book.epub");

        service
            .upload(&code, Bytes::from_static(b"%PDF"), "book2.pdf", "application/pdf")
            .await
            .unwrap();

        let blob = service.download(&code).await.unwrap();
        assert_eq!(&blob.bytes[..], b"%PDF");
        assert_eq!(blob.content_type, "application/pdf");
        assert_eq!(store.len().await, 1);

        let status = service.status(&code).await.unwrap();
        assert_eq!(status.file.unwrap().name, "book2.pdf");
    }

    #[tokio::test]
    async fn test_download_unbound_key_is_not_found() {
        let (service, _store) = test_service();
        let code = service.allocate("test").await.unwrap();

        assert!(matches!(
            service.download(&code).await,
            Err(AppError::NotFound(_))
        ));
        assert!(service.status(&code).await.unwrap().file.is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_key_and_file() {
        let (service, store) = test_service();
        let code = service.allocate("test").await.unwrap();
        service
            .upload(&code, Bytes::from_static(b"hi"), "a.txt", "text/plain")
            .await
            .unwrap();

        service.delete(&code).await.unwrap();

        assert!(matches!(service.status(&code).await, Err(AppError::NotFound(_))));
        assert!(store.is_empty().await);
        assert!(matches!(service.delete(&code).await, Err(AppError::NotFound(_))));
    }
}

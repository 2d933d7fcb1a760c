use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::transfers::handlers::{
    allocate_key, delete_session, download_file, get_session_status, upload_file,
};
use crate::features::transfers::services::TransferService;
use crate::shared::constants::MULTIPART_OVERHEAD;

/// Create routes for the transfers feature
pub fn routes(service: Arc<TransferService>) -> Router {
    let body_limit = service.max_file_size().saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/api/allocate", post(allocate_key))
        .route(
            "/api/upload",
            post(upload_file).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/download/{code}", get(download_file))
        .route(
            "/api/sessions/{code}",
            get(get_session_status).delete(delete_session),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::UploadConfig;
    use crate::features::transfers::dtos::{SessionStatusDto, UploadResponseDto};
    use crate::shared::test_helpers::{test_service, test_service_with};
    use crate::shared::types::ApiResponse;
    use axum::http::{header, HeaderValue, StatusCode};
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;

    fn server() -> TestServer {
        let (service, _store) = test_service();
        TestServer::new(routes(service)).unwrap()
    }

    fn file_part(bytes: &'static [u8], name: &str, mime: &str) -> Part {
        Part::bytes(bytes)
            .file_name(name.to_string())
            .mime_type(mime.to_string())
    }

    fn upload_form(key: &str, bytes: &'static [u8], name: &str, mime: &str) -> MultipartForm {
        MultipartForm::new()
            .add_text("key", key.to_string())
            .add_part("file", file_part(bytes, name, mime))
    }

    async fn allocate(server: &TestServer) -> String {
        let response = server.post("/api/allocate").await;
        response.assert_status(StatusCode::CREATED);
        response.text()
    }

    #[tokio::test]
    async fn test_allocate_returns_plain_text_code() {
        let server = server();
        let code = allocate(&server).await;

        assert_eq!(code.len(), 4);
        assert!(code
            .chars()
            .all(|c| "23456789ACDEFGHJKLMNPRSTUVWXYZ".contains(c)));
    }

    #[tokio::test]
    async fn test_upload_then_download() {
        let server = server();
        let code = allocate(&server).await;

        let response = server
            .post("/api/upload")
            .multipart(upload_form(
                &code,
                b"0123456789",
                "book.epub",
                "application/epub+zip",
            ))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<UploadResponseDto> = response.json();
        let uploaded = body.data.unwrap();
        assert_eq!(uploaded.key, code);
        assert_eq!(uploaded.file.name, "book.epub");
        assert_eq!(uploaded.file.size, 10);

        let response = server.get(&format!("/api/download/{code}")).await;
        response.assert_status_ok();
        assert_eq!(
            response.header(header::CONTENT_TYPE),
            HeaderValue::from_static("application/epub+zip")
        );
        assert_eq!(
            response.header(header::CONTENT_DISPOSITION),
            HeaderValue::from_static(
                "attachment; filename=\"book.epub\"; filename*=UTF-8''book.epub"
            )
        );
        assert_eq!(&response.as_bytes()[..], b"0123456789");
    }

    #[tokio::test]
    async fn test_reupload_replaces_file() {
        let server = server();
        let code = allocate(&server).await;

        server
            .post("/api/upload")
            .multipart(upload_form(
                &code,
                b"first",
                "book.epub",
                "application/epub+zip",
            ))
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post("/api/upload")
            .multipart(upload_form(
                &code,
                b"second",
                "book2.pdf",
                "application/pdf",
            ))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.get(&format!("/api/download/{code}")).await;
        response.assert_status_ok();
        assert_eq!(&response.as_bytes()[..], b"second");
        assert_eq!(
            response.header(header::CONTENT_TYPE),
            HeaderValue::from_static("application/pdf")
        );
    }

    #[tokio::test]
    async fn test_upload_to_unknown_key_is_not_found() {
        let server = server();

        server
            .post("/api/upload")
            .multipart(upload_form(
                "ZZZZ",
                b"data",
                "book.epub",
                "application/epub+zip",
            ))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upload_rejects_disallowed_extension_and_type() {
        let server = server();
        let code = allocate(&server).await;

        server
            .post("/api/upload")
            .multipart(upload_form(&code, b"MZ", "setup.exe", "application/pdf"))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .post("/api/upload")
            .multipart(upload_form(
                &code,
                b"MZ",
                "book.pdf",
                "application/x-msdownload",
            ))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .get(&format!("/api/download/{code}"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upload_rejects_oversize_file() {
        let upload = UploadConfig {
            max_file_size: 8,
            ..UploadConfig::default()
        };
        let (service, store) = test_service_with(upload);
        let server = TestServer::new(routes(service)).unwrap();
        let code = allocate(&server).await;

        server
            .post("/api/upload")
            .multipart(upload_form(&code, b"0123456789", "a.txt", "text/plain"))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_overlong_key_is_not_found_in_either_field_order() {
        let server = server();
        let key = "Z".repeat(65);

        server
            .post("/api/upload")
            .multipart(upload_form(&key, b"data", "a.txt", "text/plain"))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let file_first = MultipartForm::new()
            .add_part("file", file_part(b"data", "a.txt", "text/plain"))
            .add_text("key", key.clone());
        server
            .post("/api/upload")
            .multipart(file_first)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_oversize_upload_to_unknown_key_is_rejected_before_key_check() {
        let upload = UploadConfig {
            max_file_size: 8,
            ..UploadConfig::default()
        };
        let (service, store) = test_service_with(upload);
        let server = TestServer::new(routes(service)).unwrap();

        server
            .post("/api/upload")
            .multipart(upload_form("ZZZZ", b"0123456789", "a.txt", "text/plain"))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_upload_without_key_is_validation_error() {
        let server = server();
        let form =
            MultipartForm::new().add_part("file", file_part(b"data", "a.txt", "text/plain"));

        server
            .post("/api/upload")
            .multipart(form)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_download_unknown_or_unbound_key_is_not_found() {
        let server = server();
        let response = server.get("/api/download/ZZZZ").await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Unknown or expired key");

        let code = allocate(&server).await;
        server
            .get(&format!("/api/download/{code}"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_status_and_delete() {
        let server = server();
        let code = allocate(&server).await;

        let response = server.get(&format!("/api/sessions/{code}")).await;
        response.assert_status_ok();
        let body: ApiResponse<SessionStatusDto> = response.json();
        let status = body.data.unwrap();
        assert_eq!(status.key, code);
        assert!(status.file.is_none());

        server
            .delete(&format!("/api/sessions/{code}"))
            .await
            .assert_status_ok();
        server
            .get(&format!("/api/sessions/{code}"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .delete(&format!("/api/sessions/{code}"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

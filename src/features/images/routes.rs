use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::features::images::handlers::{list_images, upload_image};
use crate::features::images::services::UploadService;
use crate::shared::constants::{MAX_FILE_SIZE, MULTIPART_OVERHEAD};

/// Create routes for the images feature
///
/// Serves the API under `/images` and the stored files under the configured
/// public path (`/img` by default).
pub fn routes(service: Arc<UploadService>) -> Router {
    let directory = service.processor().directory();
    let static_files = ServeDir::new(directory.root());
    let public_path = directory.public_path().to_string();

    Router::new()
        .route(
            "/images",
            get(list_images).merge(
                // Allow body size up to MAX_FILE_SIZE + buffer for multipart overhead
                post(upload_image).layer(DefaultBodyLimit::max(MAX_FILE_SIZE + MULTIPART_OVERHEAD)),
            ),
        )
        .nest_service(&public_path, static_files)
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use image::GenericImageView;
    use serde_json::Value;

    use crate::shared::test_helpers::{jpeg_bytes, png_bytes, test_upload_service};

    fn photo(bytes: Vec<u8>, content_type: &str) -> Part {
        Part::bytes(bytes)
            .file_name("upload")
            .mime_type(content_type)
    }

    fn upload_form(name: &str, bytes: Vec<u8>, content_type: &str) -> MultipartForm {
        MultipartForm::new()
            .add_text("name", name.to_string())
            .add_part("photo", photo(bytes, content_type))
    }

    async fn server() -> (tempfile::TempDir, Arc<UploadService>, TestServer) {
        let (tmp, service) = test_upload_service().await;
        let server = TestServer::new(routes(service.clone())).unwrap();
        (tmp, service, server)
    }

    #[tokio::test]
    async fn test_list_images_starts_empty() {
        let (_tmp, _service, server) = server().await;

        let response = server.get("/images").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"], Value::Array(vec![]));
    }

    #[tokio::test]
    async fn test_upload_png_scenario() {
        let (_tmp, service, server) = server().await;

        let response = server
            .post("/images")
            .multipart(upload_form(
                "vacation_20240101120000.png",
                png_bytes(800, 600),
                "image/png",
            ))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["data"]["name"], "vacation_20240101120000.png");
        assert_eq!(
            body["data"]["data"]["path"],
            "/img/vacation_20240101120000.png"
        );

        let stored = service
            .processor()
            .directory()
            .root()
            .join("vacation_20240101120000.png");
        let bytes = std::fs::read(stored).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Png);
        assert_eq!(image::load_from_memory(&bytes).unwrap().dimensions(), (400, 400));

        let listed: Value = server.get("/images").await.json();
        assert_eq!(listed["data"].as_array().unwrap().len(), 1);
        assert_eq!(listed["data"][0]["path"], "/img/vacation_20240101120000.png");
    }

    #[tokio::test]
    async fn test_uploaded_image_is_served_statically() {
        let (_tmp, _service, server) = server().await;

        server
            .post("/images")
            .multipart(upload_form(
                "served_20240101120000.jpeg",
                jpeg_bytes(640, 480),
                "image/jpeg",
            ))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.get("/img/served_20240101120000.jpeg").await;
        response.assert_status_ok();
        let bytes = response.as_bytes();
        assert_eq!(image::guess_format(bytes).unwrap(), image::ImageFormat::Jpeg);
    }

    #[tokio::test]
    async fn test_bad_name_is_rejected() {
        let (_tmp, _service, server) = server().await;

        let response = server
            .post("/images")
            .multipart(upload_form("Bad Name.png", png_bytes(10, 10), "image/png"))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["status"], "fail");
        assert!(body["message"].as_str().unwrap().starts_with("Invalid name."));
    }

    #[tokio::test]
    async fn test_extension_mismatch_is_rejected() {
        let (_tmp, _service, server) = server().await;

        let response = server
            .post("/images")
            .multipart(upload_form(
                "abc_20240101120000.jpg",
                png_bytes(10, 10),
                "image/png",
            ))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(
            body["message"],
            "File extension does not match uploaded file type"
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_rejected() {
        let (_tmp, _service, server) = server().await;

        let response = server
            .post("/images")
            .multipart(MultipartForm::new().add_text("name", "abc_20240101120000.png"))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["message"], "No file uploaded");
    }

    #[tokio::test]
    async fn test_unsupported_type_is_rejected_at_parse() {
        let (_tmp, _service, server) = server().await;

        let response = server
            .post("/images")
            .multipart(upload_form(
                "abc_20240101120000.png",
                b"GIF89a".to_vec(),
                "image/gif",
            ))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["message"], "Only PNG and JPEG files are allowed");
    }

    #[tokio::test]
    async fn test_oversize_file_is_rejected_before_validation() {
        let (_tmp, service, server) = server().await;

        // Invalid name on purpose: a name error would mean the validator ran
        let response = server
            .post("/images")
            .multipart(upload_form(
                "Bad Name.png",
                vec![0u8; 15 * 1024 * 1024],
                "image/png",
            ))
            .await;
        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);

        let body: Value = response.json();
        assert_eq!(body["status"], "fail");
        assert!(service.list_images().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_image_is_server_error() {
        let (_tmp, _service, server) = server().await;

        let response = server
            .post("/images")
            .multipart(upload_form(
                "abc_20240101120000.png",
                b"not really a png".to_vec(),
                "image/png",
            ))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = response.json();
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn test_repeat_uploads() {
        let (_tmp, service, server) = server().await;
        let root = service.processor().directory().root().to_path_buf();

        for name in [
            "one_20240101120000.png",
            "two_20240101120000.png",
            "two_20240101120000.png",
        ] {
            server
                .post("/images")
                .multipart(upload_form(name, png_bytes(500, 300), "image/png"))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let listed = service.list_images().await.unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[1].name, listed[2].name);
        assert_ne!(listed[1].id, listed[2].id);

        let files = std::fs::read_dir(root).unwrap().count();
        assert_eq!(files, 2);
    }
}

//! Exercises `ImageUploader` against a local HTTP server.

use inkpost_blog::{ApiConfig, BlogApi, ImageUploader};
use inkpost_forms::{FormError, Uploader};
use serde_json::json;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn uploader(server: &MockServer) -> ImageUploader {
    ImageUploader::new(&BlogApi::new(ApiConfig::new(server.uri()).unwrap()))
}

#[tokio::test]
async fn test_upload_returns_location() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/images"))
        .and(header_exists("content-type"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"location": "https://cdn.test/cover.png"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let url = uploader(&server)
        .upload(b"\x89PNG".to_vec(), "cover.png".to_string())
        .await
        .unwrap();

    assert_eq!(url, "https://cdn.test/cover.png");
}

#[tokio::test]
async fn test_upload_without_location_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let err = uploader(&server)
        .upload(vec![1, 2, 3], "a.png".to_string())
        .await
        .unwrap_err();

    assert!(matches!(err, FormError::Upload(message) if message == "Invalid server response."));
}

#[tokio::test]
async fn test_upload_error_status_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/images"))
        .respond_with(ResponseTemplate::new(413))
        .mount(&server)
        .await;

    let err = uploader(&server)
        .upload(vec![0; 16], "big.png".to_string())
        .await
        .unwrap_err();

    assert!(matches!(err, FormError::Upload(message) if message == "HTTP Error: 413"));
}

//! Exercises `ReqwestTransport` against a local HTTP server.

use std::sync::Arc;

use inkpost_fetch::{FetchConfig, Method, ReqwestTransport, RequestState, ResourceFetcher};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> ResourceFetcher<Value> {
    ResourceFetcher::new(Arc::new(ReqwestTransport::new()))
}

#[tokio::test]
async fn test_get_decodes_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/posts"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": []})),
        )
        .mount(&server)
        .await;

    let state = fetcher()
        .fetch(&format!("{}/api/posts", server.uri()), FetchConfig::new())
        .await;

    assert_eq!(
        state,
        RequestState::Succeeded(json!({"success": true, "data": []}))
    );
}

#[tokio::test]
async fn test_post_sends_headers_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"email": "sam@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "t"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = FetchConfig::new()
        .method(Method::Post)
        .header("Content-Type", "application/json")
        .body(json!({"email": "sam@example.com"}));
    let state = fetcher()
        .fetch(&format!("{}/api/login", server.uri()), config)
        .await;

    assert_eq!(state.data(), Some(&json!({"token": "t"})));
}

#[tokio::test]
async fn test_error_status_is_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let state = fetcher()
        .fetch(&format!("{}/api/posts", server.uri()), FetchConfig::new())
        .await;

    assert_eq!(
        state.error(),
        Some("A network error was encountered: status 500")
    );
}

#[tokio::test]
async fn test_connection_refused_is_failed() {
    // Port 9 (discard) is not expected to accept HTTP connections.
    let state = fetcher()
        .fetch("http://127.0.0.1:9/api/posts", FetchConfig::new())
        .await;

    assert!(state.error().is_some());
}

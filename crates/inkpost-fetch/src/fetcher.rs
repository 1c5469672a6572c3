//! Re-triggerable resource fetcher.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{FetchError, Result};
use crate::normalize::{error_message_from, status_message};
use crate::request::{HttpRequest, Method, RequestMode};
use crate::state::RequestState;
use crate::transport::Transport;

/// Pulls a display message out of a parsed error response body.
pub type ErrorExtractor = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Options for a single fetch.
#[derive(Clone, Default)]
pub struct FetchConfig {
    /// JSON body; nothing is sent when absent.
    pub body: Option<Value>,
    /// Extra request headers.
    pub headers: HashMap<String, String>,
    /// HTTP method.
    pub method: Method,
    /// Cross-origin mode.
    pub mode: RequestMode,
    /// Extractor applied to the body of non-success responses.
    pub error_extractor: Option<ErrorExtractor>,
}

impl std::fmt::Debug for FetchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchConfig")
            .field("body", &self.body)
            .field("headers", &self.headers)
            .field("method", &self.method)
            .field("mode", &self.mode)
            .field("error_extractor", &self.error_extractor.is_some())
            .finish()
    }
}

impl FetchConfig {
    /// Creates a GET config with no body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the cross-origin mode.
    #[must_use]
    pub fn mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the error extractor.
    #[must_use]
    pub fn error_extractor(mut self, extractor: ErrorExtractor) -> Self {
        self.error_extractor = Some(extractor);
        self
    }

    fn to_request(&self, endpoint: &str) -> Result<HttpRequest> {
        let mut request = HttpRequest::new(self.method, endpoint).mode(self.mode);
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }
        match &self.body {
            Some(body) => request.json(body),
            None => Ok(request),
        }
    }
}

/// Issues requests and tracks the state of the latest one to resolve.
///
/// Clones share the same state. Calling [`fetch`](Self::fetch) again while a
/// call is outstanding does not cancel it: both run, and whichever resolves
/// last is what [`state`](Self::state) reports.
pub struct ResourceFetcher<T> {
    transport: Arc<dyn Transport>,
    state: Arc<Mutex<Option<RequestState<T>>>>,
}

impl<T> Clone for ResourceFetcher<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> std::fmt::Debug for ResourceFetcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceFetcher").finish_non_exhaustive()
    }
}

impl<T: DeserializeOwned + Clone> ResourceFetcher<T> {
    /// Creates a fetcher that has not been invoked yet.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            state: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns a snapshot of the visible state; `None` before the first call.
    pub fn state(&self) -> Option<RequestState<T>> {
        self.lock().clone()
    }

    /// Performs a request and returns the terminal state it produced.
    pub async fn fetch(&self, endpoint: &str, config: FetchConfig) -> RequestState<T> {
        *self.lock() = Some(RequestState::Pending);

        let outcome = self.perform(endpoint, &config).await;

        *self.lock() = Some(outcome.clone());
        outcome
    }

    /// Marks the state failed without touching the network.
    pub fn fail(&self, message: impl Into<String>) -> RequestState<T> {
        let outcome = RequestState::Failed(message.into());
        *self.lock() = Some(outcome.clone());
        outcome
    }

    async fn perform(&self, endpoint: &str, config: &FetchConfig) -> RequestState<T> {
        let request = match config.to_request(endpoint) {
            Ok(request) => request,
            Err(err) => return RequestState::Failed(error_message_from(&err)),
        };

        debug!(
            method = %config.method,
            url = endpoint,
            has_body = request.body.is_some(),
            "sending request"
        );

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(url = endpoint, error = %err, "request failed");
                return RequestState::Failed(error_message_from(&err));
            }
        };

        if !response.is_success() {
            let message = match (&config.error_extractor, response.parsed_body()) {
                (Some(extract), Some(body)) => extract(&body),
                _ => status_message(response.status),
            };
            warn!(
                url = endpoint,
                status = response.status,
                message = %message,
                "server rejected request"
            );
            return RequestState::Failed(message);
        }

        match serde_json::from_slice::<T>(&response.body) {
            Ok(data) => {
                debug!(url = endpoint, status = response.status, "request succeeded");
                RequestState::Succeeded(data)
            }
            Err(err) => {
                let err = FetchError::from(err);
                warn!(url = endpoint, error = %err, "undecodable response body");
                RequestState::Failed(error_message_from(&err))
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<RequestState<T>>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::HttpResponse;
    use crate::transport::MockTransport;
    use serde_json::json;

    fn join_errors() -> ErrorExtractor {
        Arc::new(|body: &Value| {
            body["errors"]
                .as_array()
                .map(|errors| {
                    errors
                        .iter()
                        .filter_map(|e| e["msg"].as_str().or_else(|| e["message"].as_str()))
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .unwrap_or_default()
        })
    }

    async fn wait_for_requests(transport: &MockTransport, count: usize) {
        while transport.request_count() < count {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_success_sets_data() {
        let transport = Arc::new(MockTransport::new());
        transport.reply(HttpResponse::json(200, &json!({"success": true, "data": [1, 2]})));
        let fetcher: ResourceFetcher<Value> = ResourceFetcher::new(transport.clone());

        assert_eq!(fetcher.state(), None);
        let state = fetcher.fetch("/api/posts", FetchConfig::new()).await;

        assert_eq!(state.data().unwrap()["data"], json!([1, 2]));
        assert_eq!(fetcher.state(), Some(state));
        let sent = transport.requests();
        assert_eq!(sent[0].method, Method::Get);
        assert_eq!(sent[0].body, None);
    }

    #[tokio::test]
    async fn test_server_error_uses_extractor() {
        let transport = Arc::new(MockTransport::new());
        transport.reply(HttpResponse::json(
            400,
            &json!({"success": false, "errors": [{"msg": "Email taken"}]}),
        ));
        let fetcher: ResourceFetcher<Value> = ResourceFetcher::new(transport);

        let config = FetchConfig::new()
            .method(Method::Post)
            .body(json!({"email": "sam@example.com"}))
            .error_extractor(join_errors());
        let state = fetcher.fetch("/api/users", config).await;

        assert_eq!(state, RequestState::Failed("Email taken".into()));
    }

    #[tokio::test]
    async fn test_server_error_without_extractor_reports_status() {
        let transport = Arc::new(MockTransport::new());
        transport.reply(HttpResponse::json(404, &json!({"message": "gone"})));
        let fetcher: ResourceFetcher<Value> = ResourceFetcher::new(transport);

        let state = fetcher.fetch("/api/posts/x", FetchConfig::new()).await;
        assert_eq!(state.error(), Some("A network error was encountered: status 404"));
    }

    #[tokio::test]
    async fn test_server_error_with_unparseable_body_reports_status() {
        let transport = Arc::new(MockTransport::new());
        transport.reply(HttpResponse::new(502).body("<html>bad gateway</html>"));
        let fetcher: ResourceFetcher<Value> = ResourceFetcher::new(transport);

        let config = FetchConfig::new().error_extractor(join_errors());
        let state = fetcher.fetch("/api/posts", config).await;
        assert_eq!(state.error(), Some("A network error was encountered: status 502"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_normalized() {
        let transport = Arc::new(MockTransport::new());
        transport.fail(FetchError::Connection("refused".into()));
        let fetcher: ResourceFetcher<Value> = ResourceFetcher::new(transport);

        let state = fetcher.fetch("/api/posts", FetchConfig::new()).await;
        assert_eq!(state.error(), Some("connection failed: refused"));
    }

    #[tokio::test]
    async fn test_malformed_success_body_fails() {
        let transport = Arc::new(MockTransport::new());
        transport.reply(HttpResponse::new(200).body("not json"));
        let fetcher: ResourceFetcher<Value> = ResourceFetcher::new(transport);

        let state = fetcher.fetch("/api/posts", FetchConfig::new()).await;
        assert!(state.error().is_some());
        assert!(state.data().is_none());
    }

    #[tokio::test]
    async fn test_headers_and_body_are_sent() {
        let transport = Arc::new(MockTransport::new());
        transport.reply(HttpResponse::json(201, &json!({})));
        let fetcher: ResourceFetcher<Value> = ResourceFetcher::new(transport.clone());

        let config = FetchConfig::new()
            .method(Method::Patch)
            .header("Authorization", "Bearer abc")
            .body(json!({"title": "Hello"}));
        fetcher.fetch("/api/posts/hello", config).await;

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, Method::Patch);
        assert_eq!(sent.get_header("authorization"), Some("Bearer abc"));
        assert_eq!(sent.body_json::<Value>(), Some(json!({"title": "Hello"})));
    }

    #[tokio::test]
    async fn test_state_is_pending_while_outstanding() {
        let transport = Arc::new(MockTransport::new());
        let gate = transport.gate();
        let fetcher: ResourceFetcher<Value> = ResourceFetcher::new(transport.clone());

        let task = tokio::spawn({
            let fetcher = fetcher.clone();
            async move { fetcher.fetch("/api/posts", FetchConfig::new()).await }
        });
        wait_for_requests(&transport, 1).await;
        assert_eq!(fetcher.state(), Some(RequestState::Pending));

        gate.send(Ok(HttpResponse::json(200, &json!(1)))).unwrap();
        assert_eq!(task.await.unwrap(), RequestState::Succeeded(json!(1)));
    }

    #[tokio::test]
    async fn test_last_resolved_call_wins() {
        let transport = Arc::new(MockTransport::new());
        let gate_a = transport.gate();
        let gate_b = transport.gate();
        let fetcher: ResourceFetcher<Value> = ResourceFetcher::new(transport.clone());

        let a = tokio::spawn({
            let fetcher = fetcher.clone();
            async move { fetcher.fetch("/a", FetchConfig::new()).await }
        });
        wait_for_requests(&transport, 1).await;
        let b = tokio::spawn({
            let fetcher = fetcher.clone();
            async move { fetcher.fetch("/b", FetchConfig::new()).await }
        });
        wait_for_requests(&transport, 2).await;

        // B resolves first and becomes visible.
        gate_b.send(Ok(HttpResponse::json(200, &json!("b")))).unwrap();
        b.await.unwrap();
        assert_eq!(fetcher.state(), Some(RequestState::Succeeded(json!("b"))));

        // A resolves later and overwrites B; nothing was cancelled.
        gate_a.send(Ok(HttpResponse::json(200, &json!("a")))).unwrap();
        a.await.unwrap();
        assert_eq!(fetcher.state(), Some(RequestState::Succeeded(json!("a"))));
    }

    #[tokio::test]
    async fn test_new_call_discards_previous_result() {
        let transport = Arc::new(MockTransport::new());
        transport.reply(HttpResponse::json(200, &json!("first")));
        transport.fail(FetchError::Connection("reset".into()));
        let fetcher: ResourceFetcher<Value> = ResourceFetcher::new(transport);

        fetcher.fetch("/x", FetchConfig::new()).await;
        let second = fetcher.fetch("/x", FetchConfig::new()).await;

        assert_eq!(second.data(), None);
        assert_eq!(fetcher.state().unwrap().error(), Some("connection failed: reset"));
    }
}

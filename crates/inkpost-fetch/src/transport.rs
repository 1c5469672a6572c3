//! HTTP transports the fetcher sends through.

use std::future::Future;
use std::pin::Pin;

use crate::error::Result;
use crate::request::{HttpRequest, Method};
use crate::response::HttpResponse;

/// A boxed future for async transport operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait for anything that can perform an HTTP exchange.
///
/// A transport reports only transport-level failures as errors. Non-success
/// status codes are ordinary responses.
pub trait Transport: Send + Sync {
    /// Sends the request and returns the full response.
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse>>;
}

/// Transport backed by a `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport around an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse>> {
        Box::pin(async move {
            tracing::trace!(mode = request.mode.as_str(), "request mode not enforced");

            let mut builder = self
                .client
                .request(reqwest_method(request.method), &request.url);
            for (key, value) in &request.headers {
                builder = builder.header(key, value);
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(k, v)| {
                    v.to_str()
                        .ok()
                        .map(|v| (k.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response.bytes().await?.to_vec();

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        })
    }
}

#[cfg(any(test, feature = "mock"))]
pub use mock::MockTransport;

#[cfg(any(test, feature = "mock"))]
mod mock {
    use std::collections::VecDeque;
    use std::sync::{Mutex, PoisonError};

    use tokio::sync::oneshot;

    use super::{BoxFuture, Transport};
    use crate::error::{FetchError, Result};
    use crate::request::HttpRequest;
    use crate::response::HttpResponse;

    enum Reply {
        Ready(Result<HttpResponse>),
        Gated(oneshot::Receiver<Result<HttpResponse>>),
    }

    /// Scripted transport for tests.
    ///
    /// Replies are consumed in the order `send` is called. A gated reply
    /// resolves only once its sender is used, which lets tests choose the
    /// order in which overlapping calls complete.
    #[derive(Default)]
    pub struct MockTransport {
        replies: Mutex<VecDeque<Reply>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl MockTransport {
        /// Creates a transport with no queued replies.
        pub fn new() -> Self {
            Self::default()
        }

        /// Queues a response.
        pub fn reply(&self, response: HttpResponse) -> &Self {
            self.push(Reply::Ready(Ok(response)));
            self
        }

        /// Queues a transport failure.
        pub fn fail(&self, error: FetchError) -> &Self {
            self.push(Reply::Ready(Err(error)));
            self
        }

        /// Queues a reply that resolves when the returned sender fires.
        pub fn gate(&self) -> oneshot::Sender<Result<HttpResponse>> {
            let (tx, rx) = oneshot::channel();
            self.push(Reply::Gated(rx));
            tx
        }

        /// Returns every request sent so far.
        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Returns how many requests were sent.
        pub fn request_count(&self) -> usize {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        fn push(&self, reply: Reply) {
            self.replies
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push_back(reply);
        }
    }

    impl Transport for MockTransport {
        fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse>> {
            let reply = self
                .replies
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front();
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(request);

            Box::pin(async move {
                match reply {
                    Some(Reply::Ready(result)) => result,
                    Some(Reply::Gated(rx)) => rx
                        .await
                        .unwrap_or_else(|_| Err(FetchError::Connection("reply dropped".into()))),
                    None => Err(FetchError::Connection("no reply queued".into())),
                }
            })
        }
    }
}

//! # inkpost-fetch
//!
//! Request lifecycle tracking over a pluggable HTTP transport.
//!
//! This crate provides:
//! - `RequestState`, the pending/succeeded/failed result of one call
//! - `ResourceFetcher`, a re-triggerable fetcher that publishes its state
//! - Error normalization into display messages
//! - A `reqwest`-backed `Transport`
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use inkpost_fetch::{FetchConfig, Method, ReqwestTransport, ResourceFetcher};
//! use serde_json::{json, Value};
//!
//! # async fn run() {
//! let fetcher: ResourceFetcher<Value> = ResourceFetcher::new(Arc::new(ReqwestTransport::new()));
//!
//! let state = fetcher
//!     .fetch(
//!         "http://localhost:3000/api/login",
//!         FetchConfig::new()
//!             .method(Method::Post)
//!             .body(json!({"email": "sam@example.com", "password": "hunter22"})),
//!     )
//!     .await;
//!
//! match state.error() {
//!     Some(message) => eprintln!("{message}"),
//!     None => println!("{:?}", state.data()),
//! }
//! # }
//! ```
//!
//! ## Failures
//!
//! Nothing a fetch does returns an error to the caller. Transport errors,
//! undecodable bodies, and non-success statuses all end in
//! `RequestState::Failed` with a message:
//!
//! - non-success status with a JSON body and an extractor: the extractor's text
//! - any other non-success status: `A network error was encountered: status <code>`
//! - everything else: the normalized error message

mod error;
mod fetcher;
mod normalize;
mod request;
mod response;
mod state;
mod transport;

pub use error::{FetchError, Result};
pub use fetcher::{ErrorExtractor, FetchConfig, ResourceFetcher};
pub use normalize::{error_message, error_message_from, status_message, NETWORK_ERROR};
pub use request::{HttpRequest, Method, RequestMode};
pub use response::HttpResponse;
pub use state::{Phase, RequestState};
pub use transport::{BoxFuture, ReqwestTransport, Transport};

#[cfg(any(test, feature = "mock"))]
pub use transport::MockTransport;

//! Error types for fetching.

use thiserror::Error;

/// Fetch-specific errors.
///
/// None of these escape a [`ResourceFetcher`](crate::ResourceFetcher): they
/// are turned into a message and stored as a failed
/// [`RequestState`](crate::RequestState).
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client failed (DNS, connection refused, aborted body, ...).
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// A body could not be encoded or decoded as JSON.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// The connection could not be established or was dropped.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;

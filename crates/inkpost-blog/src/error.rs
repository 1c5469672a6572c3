//! Error types for the blog client.

use inkpost_auth::AuthError;
use inkpost_fetch::FetchError;
use inkpost_forms::FormError;
use thiserror::Error;

/// Blog client errors.
#[derive(Debug, Error)]
pub enum BlogError {
    /// A request ended in a failed state; carries its display message.
    #[error("{0}")]
    Request(String),

    /// The API answered with a body that lacks what the call expects.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The base URL is not usable.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// No deployment has this name.
    #[error("unknown environment {0:?}, expected dev or prod")]
    InvalidEnvironment(String),

    /// Transport-level failure.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Form construction or input failure.
    #[error(transparent)]
    Form(#[from] FormError),

    /// Session failure.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Result type alias for blog operations.
pub type Result<T> = std::result::Result<T, BlogError>;

//! Error types for authentication.

use thiserror::Error;

/// Authentication-specific errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The login response carried no token.
    #[error("response did not contain a token")]
    MissingToken,

    /// The token is not three dot-separated segments.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// The payload segment is not valid base64url.
    #[error("invalid token encoding: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// The payload is not the expected JSON.
    #[error("invalid token payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// Session not found or expired.
    #[error("session expired")]
    Expired,
}

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

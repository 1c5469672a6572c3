//! Decoding the claims carried by a bearer token.
//!
//! Tokens are JWTs issued by the blog API. The client never verifies the
//! signature (it holds no key); it only reads the payload to know who is
//! logged in and until when.

use std::collections::HashMap;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};

/// Decoded token payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    /// User identifier.
    #[serde(rename = "id", alias = "_id", alias = "sub")]
    pub user_id: String,
    /// Username, when the API includes it.
    #[serde(default)]
    pub username: Option<String>,
    /// Whether the user verified their email (author access).
    #[serde(default, rename = "isVerified")]
    pub is_verified: bool,
    /// Whether the user is an administrator.
    #[serde(default, rename = "isAdmin")]
    pub is_admin: bool,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    /// Any other claims.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl SessionData {
    /// Returns when the token was issued.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Returns when the token expires.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Returns whether the token is expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Returns whether the token has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Decodes the payload segment of a JWT without verifying it.
pub fn decode_token(token: &str) -> Result<SessionData> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) if !payload.is_empty() => payload,
        _ => {
            return Err(AuthError::MalformedToken(
                "expected header.payload.signature".to_string(),
            ))
        }
    };

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Builds an unsigned token around `claims`.
#[cfg(any(test, feature = "mock"))]
pub fn unsigned_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.sig")
}

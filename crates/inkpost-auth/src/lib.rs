//! # inkpost-auth
//!
//! Client-side session handling for the blog API.
//!
//! This crate provides:
//! - `SessionStore`, the single source of the current bearer token
//! - `SessionData`, the claims decoded from that token
//! - `TokenStore`, the seam where the raw token is persisted
//!
//! ## Quick Start
//!
//! ```rust
//! use inkpost_auth::SessionStore;
//! use serde_json::json;
//!
//! let session = SessionStore::in_memory();
//! assert!(!session.is_logged_in());
//!
//! // A login response without a token leaves the session untouched.
//! assert!(session.login(&json!({"success": false})).is_err());
//! assert!(session.current().is_none());
//! ```
//!
//! ## Expiry
//!
//! Tokens are decoded when the store is created and on every login. Reading
//! [`SessionStore::current`] or [`SessionStore::token`] after the `exp` claim
//! has passed logs the user out and returns `None`.

mod error;
mod session;
mod token;

pub use error::{AuthError, Result};
pub use session::{FileTokenStore, MemoryTokenStore, SessionStore, TokenStore};
pub use token::{decode_token, SessionData};

#[cfg(any(test, feature = "mock"))]
pub use token::unsigned_token;

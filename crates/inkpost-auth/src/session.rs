//! Session management for the logged-in user.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde_json::Value;
use tracing::{info, warn};

use crate::error::{AuthError, Result};
use crate::token::{decode_token, SessionData};

/// Where the raw token string is kept between sessions.
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, if any.
    fn load(&self) -> Option<String>;

    /// Replaces the stored token.
    fn save(&self, token: &str);

    /// Removes the stored token.
    fn clear(&self);
}

/// Token store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, token: &str) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Token store backed by a single file, so a login survives restarts.
///
/// Storage failures are logged and otherwise ignored; the session then only
/// lasts as long as the process.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store that keeps the token at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file the token is kept in.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(token) => Some(token.trim().to_string()).filter(|t| !t.is_empty()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "cannot read token file");
                None
            }
        }
    }

    fn save(&self, token: &str) {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(err) = std::fs::create_dir_all(parent) {
                warn!(path = %parent.display(), error = %err, "cannot create token directory");
                return;
            }
        }
        if let Err(err) = std::fs::write(&self.path, token) {
            warn!(path = %self.path.display(), error = %err, "cannot write token file");
        }
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "cannot remove token file");
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Session {
    token: String,
    data: SessionData,
}

/// Holds the current token and its decoded claims.
///
/// Share it behind an `Arc`; every consumer that needs to know who is
/// logged in, or to attach a bearer token, reads from the same store.
pub struct SessionStore {
    store: Arc<dyn TokenStore>,
    current: RwLock<Option<Session>>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field(
                "current",
                &self
                    .current
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .as_ref()
                    .map(|session| &session.data),
            )
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Creates a store and decodes any token already persisted in `store`.
    ///
    /// A persisted token that cannot be decoded or has expired is removed.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let current = store.load().and_then(|token| match restore(&token) {
            Ok(data) => Some(Session { token, data }),
            Err(err) => {
                warn!(error = %err, "discarding stored token");
                store.clear();
                None
            }
        });

        Self {
            store,
            current: RwLock::new(current),
        }
    }

    /// Creates a store backed by a fresh [`MemoryTokenStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    /// Logs in with the `token` field of an API response.
    pub fn login(&self, response: &Value) -> Result<SessionData> {
        let token = response
            .get("token")
            .and_then(Value::as_str)
            .ok_or(AuthError::MissingToken)?;
        self.login_with_token(token)
    }

    /// Logs in with a raw token.
    pub fn login_with_token(&self, token: &str) -> Result<SessionData> {
        let data = restore(token)?;

        self.store.save(token);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Session {
            token: token.to_string(),
            data: data.clone(),
        });

        info!(user_id = %data.user_id, "logged in");
        Ok(data)
    }

    /// Clears the token.
    pub fn logout(&self) {
        self.store.clear();
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(session) = previous {
            info!(user_id = %session.data.user_id, "logged out");
        }
    }

    /// Returns the decoded claims, logging out first if they have expired.
    pub fn current(&self) -> Option<SessionData> {
        self.live().map(|session| session.data)
    }

    /// Returns the raw token, logging out first if it has expired.
    pub fn token(&self) -> Option<String> {
        self.live().map(|session| session.token)
    }

    /// Returns whether a live session exists.
    pub fn is_logged_in(&self) -> bool {
        self.live().is_some()
    }

    fn live(&self) -> Option<Session> {
        let session = self
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()?;

        if session.data.is_expired() {
            warn!(user_id = %session.data.user_id, "session expired");
            self.logout();
            return None;
        }
        Some(session)
    }
}

fn restore(token: &str) -> Result<SessionData> {
    let data = decode_token(token)?;
    if data.is_expired() {
        return Err(AuthError::Expired);
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::unsigned_token;
    use chrono::Utc;
    use serde_json::json;

    fn token_expiring_in(seconds: i64) -> String {
        let now = Utc::now().timestamp();
        unsigned_token(&json!({
            "_id": "u1",
            "username": "sam.smith",
            "iat": now,
            "exp": now + seconds
        }))
    }

    #[test]
    fn test_login_and_logout() {
        let store = Arc::new(MemoryTokenStore::new());
        let session = SessionStore::new(store.clone());
        assert!(!session.is_logged_in());

        let token = token_expiring_in(3600);
        let data = session
            .login(&json!({"success": true, "token": token}))
            .unwrap();

        assert_eq!(data.user_id, "u1");
        assert_eq!(session.token(), Some(token.clone()));
        assert_eq!(store.load(), Some(token));

        session.logout();
        assert_eq!(session.current(), None);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_login_without_token() {
        let session = SessionStore::in_memory();
        let err = session.login(&json!({"success": true})).unwrap_err();
        assert!(matches!(err, AuthError::MissingToken));
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_login_with_expired_token_is_rejected() {
        let session = SessionStore::in_memory();
        let err = session.login_with_token(&token_expiring_in(-10)).unwrap_err();
        assert!(matches!(err, AuthError::Expired));
    }

    #[test]
    fn test_decodes_persisted_token_on_load() {
        let token = token_expiring_in(3600);
        let session = SessionStore::new(Arc::new(MemoryTokenStore::with_token(token)));
        assert_eq!(
            session.current().unwrap().username.as_deref(),
            Some("sam.smith")
        );
    }

    #[test]
    fn test_discards_invalid_persisted_token() {
        let store = Arc::new(MemoryTokenStore::with_token("garbage"));
        let session = SessionStore::new(store.clone());
        assert!(!session.is_logged_in());
        assert_eq!(store.load(), None);

        let expired = Arc::new(MemoryTokenStore::with_token(token_expiring_in(-1)));
        let session = SessionStore::new(expired.clone());
        assert!(!session.is_logged_in());
        assert_eq!(expired.load(), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("token");
        let token = token_expiring_in(3600);

        let session = SessionStore::new(Arc::new(FileTokenStore::new(&path)));
        session.login_with_token(&token).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), token);

        let restored = SessionStore::new(Arc::new(FileTokenStore::new(&path)));
        assert_eq!(restored.token(), Some(token));

        restored.logout();
        assert!(!path.exists());
        assert_eq!(FileTokenStore::new(&path).load(), None);
    }

    #[test]
    fn test_expiry_detected_on_read() {
        let store = Arc::new(MemoryTokenStore::new());
        let session = SessionStore::new(store.clone());
        session.login_with_token(&token_expiring_in(3600)).unwrap();

        // Swap in an already-expired session behind the store's back.
        let expired = token_expiring_in(-5);
        *session.current.write().unwrap() = Some(Session {
            data: decode_token(&expired).unwrap(),
            token: expired,
        });

        assert_eq!(session.token(), None);
        assert_eq!(store.load(), None);
    }
}

//! Outgoing HTTP request type.

use std::collections::HashMap;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{FetchError, Result};

/// HTTP request methods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET method
    #[default]
    Get,
    /// POST method
    Post,
    /// PUT method
    Put,
    /// PATCH method
    Patch,
    /// DELETE method
    Delete,
}

impl Method {
    /// Returns the method as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl FromStr for Method {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            other => Err(FetchError::InvalidRequest(format!(
                "unsupported method: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cross-origin policy requested for a call.
///
/// Only meaningful to transports that enforce one; the reqwest transport
/// records it and otherwise ignores it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestMode {
    /// Cross-origin requests allowed.
    #[default]
    Cors,
    /// Opaque cross-origin requests.
    NoCors,
    /// Same-origin only.
    SameOrigin,
}

impl RequestMode {
    /// Returns the mode as its fetch-standard name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cors => "cors",
            Self::NoCors => "no-cors",
            Self::SameOrigin => "same-origin",
        }
    }
}

/// An outgoing HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute request URL.
    pub url: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body, absent when nothing is sent.
    pub body: Option<Vec<u8>>,
    /// Cross-origin mode.
    pub mode: RequestMode,
}

impl HttpRequest {
    /// Creates a new request without headers or body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
            mode: RequestMode::default(),
        }
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the raw body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes `value` as the JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(value)?);
        Ok(self)
    }

    /// Sets the cross-origin mode.
    #[must_use]
    pub fn mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    /// Gets a header value.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        // Case-insensitive header lookup
        let key_lower = key.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| k.to_lowercase() == key_lower)
            .map(|(_, v)| v.as_str())
    }

    /// Parses the body as JSON.
    pub fn body_json<T: serde::de::DeserializeOwned>(&self) -> Option<T> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_slice(body).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parsing() {
        assert_eq!("GET".parse::<Method>().ok(), Some(Method::Get));
        assert_eq!("patch".parse::<Method>().ok(), Some(Method::Patch));
        assert!("TRACE".parse::<Method>().is_err());
        assert_eq!(Method::default(), Method::Get);
    }

    #[test]
    fn test_request_builder() {
        let req = HttpRequest::new(Method::Post, "http://localhost:3000/api/login")
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({"email": "sam@example.com"}))
            .unwrap();

        assert_eq!(req.get_header("content-type"), Some("application/json"));
        assert_eq!(req.mode, RequestMode::Cors);
        let body: serde_json::Value = req.body_json().unwrap();
        assert_eq!(body["email"], "sam@example.com");
    }

    #[test]
    fn test_request_without_body() {
        let req = HttpRequest::new(Method::Get, "/api/posts");
        assert!(req.body.is_none());
        assert_eq!(req.body_json::<serde_json::Value>(), None);
    }
}

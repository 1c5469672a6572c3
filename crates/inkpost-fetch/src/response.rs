//! Incoming HTTP response type.

use std::collections::HashMap;

/// An HTTP response as seen by the fetcher.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a new response with the given status.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Creates a response with JSON content.
    pub fn json<T: serde::Serialize>(status: u16, data: &T) -> Self {
        Self {
            status,
            headers: [("Content-Type".to_string(), "application/json".to_string())]
                .into_iter()
                .collect(),
            body: serde_json::to_vec(data).unwrap_or_default(),
        }
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the body as a string.
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }

    /// Parses the body as JSON, if it is JSON.
    pub fn parsed_body(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_json() {
        let res = HttpResponse::json(201, &serde_json::json!({"success": true}));
        assert!(res.is_success());
        assert_eq!(
            res.headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
        assert_eq!(res.parsed_body().unwrap()["success"], true);
    }

    #[test]
    fn test_response_status_ranges() {
        assert!(HttpResponse::new(204).is_success());
        assert!(!HttpResponse::new(199).is_success());
        assert!(!HttpResponse::new(302).is_success());
        assert!(!HttpResponse::new(404).is_success());
    }

    #[test]
    fn test_non_json_body() {
        let res = HttpResponse::new(502).body("Bad Gateway");
        assert_eq!(res.parsed_body(), None);
        assert_eq!(res.body_string(), Some("Bad Gateway".to_string()));
    }
}

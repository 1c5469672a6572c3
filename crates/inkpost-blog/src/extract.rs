//! Pulling a display message out of an API error body.

use std::sync::Arc;

use inkpost_fetch::{ErrorExtractor, NETWORK_ERROR};
use serde_json::Value;

/// Returns the message of an error response.
///
/// Joins the `msg` (or `message`) of every entry in `errors` with a space.
/// Without errors, falls back to the top-level `message`, then to a generic
/// network error.
pub fn extract_error_msg(body: &Value) -> String {
    if let Some(errors) = body.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            return errors
                .iter()
                .filter_map(|err| {
                    err.get("msg")
                        .and_then(Value::as_str)
                        .or_else(|| err.get("message").and_then(Value::as_str))
                })
                .collect::<Vec<_>>()
                .join(" ");
        }
    }

    match body.get("message") {
        Some(Value::String(message)) if !message.is_empty() => message.clone(),
        Some(Value::String(_) | Value::Null | Value::Bool(false)) | None => {
            NETWORK_ERROR.to_string()
        }
        Some(other) => other.to_string(),
    }
}

/// Returns [`extract_error_msg`] as an extractor for fetch configs and forms.
pub fn error_extractor() -> ErrorExtractor {
    Arc::new(extract_error_msg)
}

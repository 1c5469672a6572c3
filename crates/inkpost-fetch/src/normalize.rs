//! Turning arbitrary failure values into a single display message.

use std::fmt::Debug;

use serde::Serialize;
use serde_json::Value;

/// Generic message used when nothing better is available.
pub const NETWORK_ERROR: &str = "A network error was encountered";

/// Message for a non-success status without an extractable body.
pub fn status_message(status: u16) -> String {
    format!("{NETWORK_ERROR}: status {status}")
}

/// Produces a message from any serializable failure value.
///
/// An object with a string `message` yields that message verbatim and a JSON
/// string yields its contents. Anything else is rendered as JSON text, and if
/// serialization itself fails, as its `Debug` form. The result is never
/// empty.
///
/// ```
/// use inkpost_fetch::error_message;
/// use serde_json::json;
///
/// assert_eq!(error_message(&json!({"message": "Not found"})), "Not found");
/// assert_eq!(error_message(&json!({"foo": 1})), r#"{"foo":1}"#);
/// ```
pub fn error_message<T: Serialize + Debug + ?Sized>(value: &T) -> String {
    let message = match serde_json::to_value(value) {
        Ok(value) => message_from_value(&value),
        Err(_) => format!("{value:?}"),
    };
    non_empty(message)
}

/// Produces a message from a Rust error, using its `Display` text.
pub fn error_message_from<E: std::error::Error + ?Sized>(error: &E) -> String {
    non_empty(error.to_string())
}

fn message_from_value(value: &Value) -> String {
    match value {
        Value::Object(map) => match map.get("message") {
            Some(Value::String(message)) => message.clone(),
            _ => value.to_string(),
        },
        Value::String(message) => message.clone(),
        other => other.to_string(),
    }
}

fn non_empty(message: String) -> String {
    if message.trim().is_empty() {
        NETWORK_ERROR.to_string()
    } else {
        message
    }
}

//! Error types for forms.

use std::collections::HashMap;
use thiserror::Error;

/// Form-specific errors.
///
/// These report misuse of the engine (unknown fields, values of the wrong
/// type, missing collaborators) and collaborator failures. Validation and
/// network failures are not errors; they end up in the form state.
#[derive(Debug, Error)]
pub enum FormError {
    /// Two fields share a name.
    #[error("duplicate field name: {0}")]
    DuplicateField(String),

    /// More than one rich-text field in a schema.
    #[error("a form may hold at most one rich-text field, found {0} and {1}")]
    MultipleRichText(String, String),

    /// No field with this name.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Invalid field value.
    #[error("invalid value for field {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// An operation needs a collaborator the engine was built without.
    #[error("no {0} configured")]
    MissingCollaborator(&'static str),

    /// The upload collaborator failed.
    #[error("upload failed: {0}")]
    Upload(String),

    /// The rich-text collaborator failed.
    #[error("editor failed: {0}")]
    Editor(String),
}

/// Current validation message per field.
///
/// Every field of the schema has an entry; an empty string means the field
/// has no error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    /// Messages keyed by field name.
    pub errors: HashMap<String, String>,
}

impl ValidationErrors {
    /// Creates a new empty ValidationErrors.
    pub fn new() -> Self {
        Self {
            errors: HashMap::new(),
        }
    }

    /// Sets the message for a field; an empty message clears it.
    pub fn set(&mut self, field: &str, message: impl Into<String>) {
        self.errors.insert(field.to_string(), message.into());
    }

    /// Clears the message for a field, keeping its entry.
    pub fn clear(&mut self, field: &str) {
        if let Some(message) = self.errors.get_mut(field) {
            message.clear();
        }
    }

    /// Returns whether no field carries a message.
    pub fn is_empty(&self) -> bool {
        self.errors.values().all(String::is_empty)
    }

    /// Returns the number of fields carrying a message.
    pub fn len(&self) -> usize {
        self.errors.values().filter(|m| !m.is_empty()).count()
    }

    /// Returns the message for a field, `None` when it has none.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .get(field)
            .map(String::as_str)
            .filter(|m| !m.is_empty())
    }

    /// Returns all non-empty messages.
    pub fn all_errors(&self) -> Vec<(&str, &str)> {
        self.errors
            .iter()
            .filter(|(_, message)| !message.is_empty())
            .map(|(field, message)| (field.as_str(), message.as_str()))
            .collect()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (field, message) in self.all_errors() {
            writeln!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_messages_do_not_count() {
        let mut errors = ValidationErrors::new();
        errors.set("email", "");
        errors.set("password", "Please fill out this field.");

        assert!(!errors.is_empty());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), None);
        assert_eq!(errors.get("password"), Some("Please fill out this field."));

        errors.clear("password");
        assert!(errors.is_empty());
        assert_eq!(errors.errors.len(), 2);
    }
}

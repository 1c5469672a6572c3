//! Text field types.

use crate::schema::{FieldKind, FieldSchema, InputType};

/// Creates a single-line text field.
pub fn text_field(name: &str, label: &str, required: bool) -> FieldSchema {
    let field = FieldSchema::new(name, label, FieldKind::Text(InputType::Text));
    if required {
        field.required()
    } else {
        field
    }
}

/// Creates a multi-line text field.
pub fn textarea_field(name: &str, label: &str, rows: usize, required: bool) -> FieldSchema {
    let field = FieldSchema::new(name, label, FieldKind::TextArea { rows });
    if required {
        field.required()
    } else {
        field
    }
}

/// Creates an email field.
pub fn email_field(name: &str, label: &str, required: bool) -> FieldSchema {
    let field = FieldSchema::new(name, label, FieldKind::Text(InputType::Email));
    if required {
        field.required()
    } else {
        field
    }
}

/// Creates a password field. Password fields are always required.
pub fn password_field(name: &str, label: &str, min_length: Option<usize>) -> FieldSchema {
    let field = FieldSchema::new(name, label, FieldKind::Text(InputType::Password)).required();

    match min_length {
        Some(min) => field.min_length(min),
        None => field,
    }
}

/// Creates a URL field.
pub fn url_field(name: &str, label: &str, required: bool) -> FieldSchema {
    let field =
        FieldSchema::new(name, label, FieldKind::Text(InputType::Url)).placeholder("https://");
    if required {
        field.required()
    } else {
        field
    }
}

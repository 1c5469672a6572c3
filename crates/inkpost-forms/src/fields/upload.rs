//! Fields whose values come from outside a plain input: uploads, item
//! lists and the rich-text editor.

use crate::schema::{FieldKind, FieldSchema};

/// Creates a file field. The stored value is the uploaded file's URL.
pub fn file_field(name: &str, label: &str, accept: Option<&str>) -> FieldSchema {
    FieldSchema::new(
        name,
        label,
        FieldKind::File {
            accept: accept.map(str::to_string),
        },
    )
}

/// Creates a file field that only accepts images.
pub fn image_field(name: &str, label: &str) -> FieldSchema {
    file_field(name, label, Some("image/*"))
}

/// Creates a list field; items are committed one at a time.
pub fn array_field(name: &str, label: &str) -> FieldSchema {
    FieldSchema::new(name, label, FieldKind::Array)
}

/// Creates the rich-text field. A form holds at most one.
pub fn rich_text_field(name: &str, label: &str) -> FieldSchema {
    FieldSchema::new(name, label, FieldKind::RichText).col_span()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_field() {
        let field = image_field("image", "Cover image");
        assert_eq!(
            field.kind,
            FieldKind::File {
                accept: Some("image/*".to_string())
            }
        );
    }

    #[test]
    fn test_rich_text_field_spans_form() {
        let field = rich_text_field("content", "Content");
        assert!(field.col_span);
        assert_eq!(field.kind, FieldKind::RichText);
    }
}

//! Checkbox field types.

use crate::schema::{FieldKind, FieldSchema};

/// Creates a toggle rendered as a switch.
pub fn toggle_field(name: &str, label: &str) -> FieldSchema {
    FieldSchema::new(name, label, FieldKind::Toggle)
}

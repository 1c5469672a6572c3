//! Select field types.

use crate::schema::{FieldKind, FieldSchema, SelectOption};

/// Creates a choice field (select/dropdown).
pub fn choice_field(
    name: &str,
    label: &str,
    choices: Vec<(&str, &str)>,
    required: bool,
) -> FieldSchema {
    let options = choices
        .into_iter()
        .map(|(v, l)| SelectOption::new(v, l))
        .collect();

    let field = FieldSchema::new(name, label, FieldKind::Select { options });
    if required {
        field.required()
    } else {
        field
    }
}

//! Field and form schema definitions.

use std::collections::HashSet;

use crate::error::{FormError, Result};
use crate::validation::Validator;
use crate::value::FieldValue;

/// Input type of a single-line text field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputType {
    /// Free text.
    #[default]
    Text,
    /// Email address, checked for format.
    Email,
    /// Masked text.
    Password,
    /// Absolute URL, checked for format.
    Url,
}

impl InputType {
    /// Returns the HTML input type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Password => "password",
            Self::Url => "url",
        }
    }
}

/// One choice of a select field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Submitted value.
    pub value: String,
    /// Displayed label.
    pub label: String,
}

impl SelectOption {
    /// Creates an option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// What kind of control a field is, with the configuration only that kind
/// needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line input.
    Text(InputType),
    /// Multi-line input.
    TextArea {
        /// Visible rows.
        rows: usize,
    },
    /// Dropdown.
    Select {
        /// Available choices.
        options: Vec<SelectOption>,
    },
    /// Checkbox or switch.
    Toggle,
    /// File picker; the value is the URL of the uploaded file.
    File {
        /// Accepted MIME types, e.g. `image/*`.
        accept: Option<String>,
    },
    /// Ordered list of distinct strings.
    Array,
    /// Rich-text editor; content is read from the editor at submit time.
    RichText,
}

impl FieldKind {
    /// Returns the value a field of this kind starts with.
    pub fn empty_value(&self) -> FieldValue {
        match self {
            Self::Toggle => FieldValue::Bool(false),
            Self::Array => FieldValue::List(Vec::new()),
            Self::Text(_)
            | Self::TextArea { .. }
            | Self::Select { .. }
            | Self::File { .. }
            | Self::RichText => FieldValue::Text(String::new()),
        }
    }

    /// Returns whether `value` has the type this kind stores.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (Self::Toggle, FieldValue::Bool(_))
                | (Self::Array, FieldValue::List(_))
                | (
                    Self::Text(_) | Self::TextArea { .. } | Self::Select { .. } | Self::File { .. },
                    FieldValue::Text(_)
                )
        )
    }

    /// Returns whether length and format constraints apply.
    pub fn is_text_like(&self) -> bool {
        matches!(self, Self::Text(_) | Self::TextArea { .. })
    }
}

/// Declarative description of one form field.
pub struct FieldSchema {
    /// Field name, unique within its form.
    pub name: String,
    /// Field label.
    pub label: String,
    /// Control kind.
    pub kind: FieldKind,
    /// Placeholder text.
    pub placeholder: Option<String>,
    /// Whether the field is required.
    pub required: bool,
    /// Minimum length in characters, for text-like fields.
    pub min_length: Option<usize>,
    /// Maximum length in characters, for text-like fields.
    pub max_length: Option<usize>,
    /// Additional validators run after the built-in constraints.
    pub validators: Vec<Box<dyn Validator>>,
    /// Whether the control spans the full form width.
    pub col_span: bool,
    /// Whether the control takes focus on first render.
    pub autofocus: bool,
}

impl std::fmt::Debug for FieldSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSchema")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("placeholder", &self.placeholder)
            .field("required", &self.required)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("col_span", &self.col_span)
            .finish_non_exhaustive()
    }
}

impl FieldSchema {
    /// Creates a new field definition.
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            placeholder: None,
            required: false,
            min_length: None,
            max_length: None,
            validators: Vec::new(),
            col_span: false,
            autofocus: false,
        }
    }

    /// Makes the field required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets placeholder text.
    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    /// Sets the minimum length.
    #[must_use]
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Sets the maximum length.
    #[must_use]
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Adds a validator.
    #[must_use]
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Spans the full form width.
    #[must_use]
    pub fn col_span(mut self) -> Self {
        self.col_span = true;
        self
    }

    /// Focuses the control on first render.
    #[must_use]
    pub fn autofocus(mut self) -> Self {
        self.autofocus = true;
        self
    }
}

/// An ordered list of fields with unique names.
#[derive(Debug, Default)]
pub struct FormSchema {
    fields: Vec<FieldSchema>,
}

impl FormSchema {
    /// Creates a schema, rejecting duplicate names and a second rich-text
    /// field.
    pub fn new(fields: Vec<FieldSchema>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut rich_text: Option<&str> = None;

        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(FormError::DuplicateField(field.name.clone()));
            }
            if field.kind == FieldKind::RichText {
                if let Some(first) = rich_text {
                    return Err(FormError::MultipleRichText(
                        first.to_string(),
                        field.name.clone(),
                    ));
                }
                rich_text = Some(&field.name);
            }
        }

        Ok(Self { fields })
    }

    /// Creates a schema with no fields.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the fields in order.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Looks a field up by name.
    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the rich-text field, if the schema has one.
    pub fn rich_text_field(&self) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.kind == FieldKind::RichText)
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A simple form builder for creating schemas programmatically.
#[derive(Debug, Default)]
pub struct FormBuilder {
    fields: Vec<FieldSchema>,
}

impl FormBuilder {
    /// Creates a new form builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field to the form.
    #[must_use]
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Validates and returns the schema.
    pub fn build(self) -> Result<FormSchema> {
        FormSchema::new(self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_builder() {
        let field = FieldSchema::new("username", "Username", FieldKind::Text(InputType::Text))
            .required()
            .placeholder("sam.smith")
            .max_length(150)
            .col_span();

        assert_eq!(field.name, "username");
        assert!(field.required);
        assert_eq!(field.placeholder.as_deref(), Some("sam.smith"));
        assert_eq!(field.max_length, Some(150));
        assert!(field.col_span);
    }

    #[test]
    fn test_empty_values_follow_kind() {
        assert_eq!(FieldKind::Toggle.empty_value(), FieldValue::Bool(false));
        assert_eq!(FieldKind::Array.empty_value(), FieldValue::List(vec![]));
        assert_eq!(
            FieldKind::TextArea { rows: 5 }.empty_value(),
            FieldValue::Text(String::new())
        );
    }

    #[test]
    fn test_accepts() {
        assert!(FieldKind::Toggle.accepts(&FieldValue::Bool(true)));
        assert!(!FieldKind::Toggle.accepts(&FieldValue::from("true")));
        assert!(FieldKind::Array.accepts(&FieldValue::List(vec![])));
        assert!(!FieldKind::RichText.accepts(&FieldValue::from("<p>x</p>")));
    }

    #[test]
    fn test_builder_rejects_duplicates() {
        let err = FormBuilder::new()
            .field(FieldSchema::new("email", "Email", FieldKind::Text(InputType::Email)))
            .field(FieldSchema::new("email", "Email again", FieldKind::Text(InputType::Email)))
            .build()
            .unwrap_err();
        assert!(matches!(err, FormError::DuplicateField(name) if name == "email"));
    }

    #[test]
    fn test_single_rich_text_field() {
        let err = FormSchema::new(vec![
            FieldSchema::new("content", "Content", FieldKind::RichText),
            FieldSchema::new("summary", "Summary", FieldKind::RichText),
        ])
        .unwrap_err();
        assert!(matches!(err, FormError::MultipleRichText(..)));

        let schema = FormSchema::new(vec![
            FieldSchema::new("title", "Title", FieldKind::Text(InputType::Text)),
            FieldSchema::new("content", "Content", FieldKind::RichText),
        ])
        .unwrap();
        assert_eq!(schema.rich_text_field().unwrap().name, "content");
        assert_eq!(schema.get("title").unwrap().label, "Title");
        assert_eq!(schema.len(), 2);
    }
}

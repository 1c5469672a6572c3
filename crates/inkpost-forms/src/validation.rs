//! Field validators and form-wide validation.
//!
//! Built-in constraints (`required`, lengths, email and URL formats) follow
//! browser constraint validation, including its messages. They are checked
//! in the browser's order: missing value, type mismatch, too long, too
//! short. Custom validators such as patterns run after them. The first
//! failure wins.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::schema::{FieldKind, FieldSchema, FormSchema, InputType};
use crate::value::FieldValue;

/// Name of the password field other fields are compared against.
pub const PASSWORD_FIELD: &str = "password";

/// Name of the field that must repeat the password.
pub const CONFIRM_PASSWORD_FIELD: &str = "confirmPassword";

/// Message for a password confirmation that does not match.
pub const PASSWORD_MISMATCH: &str = "Password confirmation must match password.";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$")
        .expect("email pattern compiles")
});

/// Trait for field validators.
pub trait Validator: Send + Sync {
    /// Validates a value and returns an error message if invalid.
    fn validate(&self, value: &str) -> Result<(), String>;
}

/// Validator that requires a non-empty value.
#[derive(Debug, Clone)]
pub struct RequiredValidator {
    message: String,
}

impl RequiredValidator {
    /// Creates a new RequiredValidator with default message.
    pub fn new() -> Self {
        Self::with_message("Please fill out this field.")
    }

    /// Creates a new RequiredValidator with custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for RequiredValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for RequiredValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            Err(self.message.clone())
        } else {
            Ok(())
        }
    }
}

/// Validator that enforces a maximum length.
#[derive(Debug, Clone)]
pub struct MaxLengthValidator {
    max_length: usize,
    message: Option<String>,
}

impl MaxLengthValidator {
    /// Creates a new MaxLengthValidator.
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            message: None,
        }
    }

    /// Creates a new MaxLengthValidator with custom message.
    pub fn with_message(max_length: usize, message: impl Into<String>) -> Self {
        Self {
            max_length,
            message: Some(message.into()),
        }
    }
}

impl Validator for MaxLengthValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        let length = value.chars().count();
        if length > self.max_length {
            Err(self.message.clone().unwrap_or_else(|| {
                format!(
                    "Please shorten this text to {} characters or less (you are currently using {length} characters).",
                    self.max_length
                )
            }))
        } else {
            Ok(())
        }
    }
}

/// Validator that enforces a minimum length on non-empty values.
#[derive(Debug, Clone)]
pub struct MinLengthValidator {
    min_length: usize,
    message: Option<String>,
}

impl MinLengthValidator {
    /// Creates a new MinLengthValidator.
    pub fn new(min_length: usize) -> Self {
        Self {
            min_length,
            message: None,
        }
    }

    /// Creates a new MinLengthValidator with custom message.
    pub fn with_message(min_length: usize, message: impl Into<String>) -> Self {
        Self {
            min_length,
            message: Some(message.into()),
        }
    }
}

impl Validator for MinLengthValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        let length = value.chars().count();
        if length > 0 && length < self.min_length {
            Err(self.message.clone().unwrap_or_else(|| {
                format!(
                    "Please lengthen this text to {} characters or more (you are currently using {length} characters).",
                    self.min_length
                )
            }))
        } else {
            Ok(())
        }
    }
}

/// Validator for email addresses.
#[derive(Debug, Clone)]
pub struct EmailValidator {
    message: String,
}

impl EmailValidator {
    /// Creates a new EmailValidator with default message.
    pub fn new() -> Self {
        Self::with_message("Please enter an email address.")
    }

    /// Creates a new EmailValidator with custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for EmailValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for EmailValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if value.is_empty() || EMAIL_RE.is_match(value) {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }
}

/// Validator for URL values.
#[derive(Debug, Clone)]
pub struct UrlValidator {
    message: String,
}

impl UrlValidator {
    /// Creates a new UrlValidator with default message.
    pub fn new() -> Self {
        Self::with_message("Please enter a URL.")
    }

    /// Creates a new UrlValidator with custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for UrlValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for UrlValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        let has_scheme = ["http://", "https://"]
            .iter()
            .any(|scheme| value.len() > scheme.len() && value.starts_with(scheme));
        if value.is_empty() || has_scheme {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }
}

/// Validator using a custom regex pattern, anchored like the HTML `pattern`
/// attribute.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    pattern: Regex,
    message: String,
}

impl RegexValidator {
    /// Creates a new RegexValidator.
    pub fn new(pattern: &str, message: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(&format!("^(?:{pattern})$"))?,
            message: message.into(),
        })
    }
}

impl Validator for RegexValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if value.is_empty() || self.pattern.is_match(value) {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }
}

/// Outcome of validating one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValidity {
    /// Whether the value satisfies every constraint.
    pub valid: bool,
    /// The failing constraint's message, empty when valid.
    pub message: String,
}

impl FieldValidity {
    fn valid() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

/// Outcome of validating a whole form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValidity {
    /// Whether every field is valid.
    pub valid: bool,
    /// One message per field, empty when that field is valid.
    pub messages: HashMap<String, String>,
}

/// Validates one field against its constraints.
///
/// `password` is the current value of the form's password field, if it has
/// one. The password confirmation field is invalid whenever it differs from
/// that value, whatever its other constraints say.
pub fn validate_field(
    field: &FieldSchema,
    value: &FieldValue,
    password: Option<&str>,
) -> FieldValidity {
    let native = native_validity(field, value);

    if field.name == CONFIRM_PASSWORD_FIELD && password != value.as_str() {
        return FieldValidity::invalid(PASSWORD_MISMATCH);
    }
    native
}

fn native_validity(field: &FieldSchema, value: &FieldValue) -> FieldValidity {
    if field.kind == FieldKind::RichText {
        return FieldValidity::valid();
    }
    if field.kind.is_text_like() {
        let text = value.as_str().unwrap_or_default();
        return into_validity(text_constraints(field, text));
    }
    if field.required && value.is_empty() {
        return FieldValidity::invalid(missing_message(&field.kind));
    }

    match &field.kind {
        FieldKind::Array => {
            let items = value.as_list().unwrap_or_default();
            match items
                .iter()
                .find_map(|item| run_validators(&field.validators, item).err())
            {
                Some(message) => FieldValidity::invalid(message),
                None => FieldValidity::valid(),
            }
        }
        FieldKind::Select { .. } => {
            into_validity(run_validators(&field.validators, value.as_str().unwrap_or_default()))
        }
        _ => FieldValidity::valid(),
    }
}

fn missing_message(kind: &FieldKind) -> &'static str {
    match kind {
        FieldKind::Toggle => "Please check this box if you want to proceed.",
        FieldKind::Array => "Please add at least one item.",
        FieldKind::Select { .. } => "Please select an item in the list.",
        FieldKind::File { .. } => "Please select a file.",
        _ => "Please fill out this field.",
    }
}

fn text_constraints(field: &FieldSchema, text: &str) -> Result<(), String> {
    if field.required {
        RequiredValidator::new().validate(text)?;
    }
    match field.kind {
        FieldKind::Text(InputType::Email) => EmailValidator::new().validate(text)?,
        FieldKind::Text(InputType::Url) => UrlValidator::new().validate(text)?,
        _ => {}
    }
    if let Some(max) = field.max_length {
        MaxLengthValidator::new(max).validate(text)?;
    }
    if let Some(min) = field.min_length {
        MinLengthValidator::new(min).validate(text)?;
    }
    run_validators(&field.validators, text)
}

fn run_validators(validators: &[Box<dyn Validator>], value: &str) -> Result<(), String> {
    validators.iter().try_for_each(|v| v.validate(value))
}

fn into_validity(result: Result<(), String>) -> FieldValidity {
    match result {
        Ok(()) => FieldValidity::valid(),
        Err(message) => FieldValidity::invalid(message),
    }
}

/// Validates every field of `schema` against `values`.
///
/// Fields missing from `values` are validated as if empty.
pub fn validate_form(schema: &FormSchema, values: &HashMap<String, FieldValue>) -> FormValidity {
    let password = values.get(PASSWORD_FIELD).and_then(FieldValue::as_str);
    let mut valid = true;
    let mut messages = HashMap::with_capacity(schema.len());

    for field in schema.fields() {
        let empty = field.kind.empty_value();
        let value = values.get(&field.name).unwrap_or(&empty);
        let validity = validate_field(field, value, password);

        valid &= validity.valid;
        messages.insert(field.name.clone(), validity.message);
    }

    FormValidity { valid, messages }
}

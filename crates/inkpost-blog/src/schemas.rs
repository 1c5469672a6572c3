//! The forms the blog client shows.

use inkpost_forms::fields::{email_field, password_field, rich_text_field, text_field, textarea_field};
use inkpost_forms::validation::{CONFIRM_PASSWORD_FIELD, PASSWORD_FIELD};
use inkpost_forms::{FormBuilder, FormSchema, Result};

/// Minimum password length the API accepts.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Account creation.
pub fn signup_schema() -> Result<FormSchema> {
    FormBuilder::new()
        .field(text_field("firstName", "First Name", true).placeholder("Sam"))
        .field(text_field("lastName", "Last Name", true).placeholder("Smith"))
        .field(
            text_field("username", "Username", true)
                .placeholder("sam.smith")
                .col_span(),
        )
        .field(
            email_field("email", "Email", true)
                .placeholder("example@email.com")
                .min_length(6)
                .col_span(),
        )
        .field(password_field(PASSWORD_FIELD, "Password", Some(MIN_PASSWORD_LENGTH)))
        .field(password_field(
            CONFIRM_PASSWORD_FIELD,
            "Confirm Password",
            Some(MIN_PASSWORD_LENGTH),
        ))
        .build()
}

/// Logging in.
pub fn login_schema() -> Result<FormSchema> {
    FormBuilder::new()
        .field(
            email_field("email", "Email", true)
                .placeholder("example@email.com")
                .col_span(),
        )
        .field(password_field(PASSWORD_FIELD, "Password", Some(MIN_PASSWORD_LENGTH)).col_span())
        .build()
}

/// Writing a post.
pub fn create_post_schema() -> Result<FormSchema> {
    FormBuilder::new()
        .field(
            text_field("title", "Title", true)
                .placeholder("title of post")
                .col_span(),
        )
        .field(rich_text_field("content", "Content").placeholder("Enter post content here..."))
        .build()
}

/// Responding to a post.
pub fn comment_schema() -> Result<FormSchema> {
    FormBuilder::new()
        .field(
            textarea_field("comment", "Comment", 5, true)
                .placeholder("Post a response...")
                .col_span(),
        )
        .build()
}

/// Asking for author access; the request carries no fields.
pub fn become_author_schema() -> FormSchema {
    FormSchema::empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpost_forms::validation::PASSWORD_MISMATCH;
    use inkpost_forms::{validate_form, FieldKind, FieldValue};
    use std::collections::HashMap;

    #[test]
    fn test_signup_fields() {
        let schema = signup_schema().unwrap();
        let names: Vec<_> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            ["firstName", "lastName", "username", "email", "password", "confirmPassword"]
        );
        assert!(schema.fields().iter().all(|f| f.required));
        assert_eq!(schema.get("email").unwrap().min_length, Some(6));
    }

    #[test]
    fn test_signup_rejects_mismatched_confirmation() {
        let schema = signup_schema().unwrap();
        let values: HashMap<String, FieldValue> = [
            ("firstName", "Sam"),
            ("lastName", "Smith"),
            ("username", "sam.smith"),
            ("email", "sam@example.com"),
            ("password", "password123"),
            ("confirmPassword", "password321"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), FieldValue::from(v)))
        .collect();

        let result = validate_form(&schema, &values);
        assert!(!result.valid);
        assert_eq!(result.messages["confirmPassword"], PASSWORD_MISMATCH);
        assert_eq!(result.messages["email"], "");
    }

    #[test]
    fn test_other_schemas() {
        assert_eq!(login_schema().unwrap().len(), 2);
        assert_eq!(
            create_post_schema().unwrap().rich_text_field().unwrap().name,
            "content"
        );
        let comment = comment_schema().unwrap();
        assert_eq!(comment.get("comment").unwrap().kind, FieldKind::TextArea { rows: 5 });
        assert!(become_author_schema().is_empty());
    }
}

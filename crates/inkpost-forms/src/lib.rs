//! # inkpost-forms
//!
//! Schema-driven forms for the blog client.
//!
//! This crate provides:
//! - Field schemas with one tagged variant per control kind
//! - Browser-style constraint validation, plus password confirmation
//! - `FormEngine`, which owns values and messages and submits them
//! - Bootstrap 5 rendering
//!
//! ## Quick Start
//!
//! ```no_run
//! use inkpost_forms::fields::{email_field, password_field};
//! use inkpost_forms::{FormBuilder, FormEngine, SubmitOutcome};
//!
//! # async fn run() -> inkpost_forms::Result<()> {
//! let schema = FormBuilder::new()
//!     .field(email_field("email", "Email", true).col_span())
//!     .field(password_field("password", "Password", Some(8)).col_span())
//!     .build()?;
//!
//! let form = FormEngine::builder(schema, "http://localhost:3000/api/login").build();
//! form.input("email", "sam@example.com")?;
//! form.input("password", "hunter2hunter2")?;
//!
//! match form.submit().await {
//!     SubmitOutcome::Sent(state) => println!("{state:?}"),
//!     SubmitOutcome::Invalid(messages) => println!("{messages:?}"),
//!     SubmitOutcome::Disabled => {}
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Validation
//!
//! ```rust
//! use inkpost_forms::fields::password_field;
//! use inkpost_forms::validation::{validate_field, PASSWORD_MISMATCH};
//! use inkpost_forms::FieldValue;
//!
//! let confirm = password_field("confirmPassword", "Confirm Password", Some(8));
//! let result = validate_field(&confirm, &FieldValue::from("password123"), Some("password124"));
//!
//! assert!(!result.valid);
//! assert_eq!(result.message, PASSWORD_MISMATCH);
//! ```

pub mod collab;
mod engine;
mod error;
pub mod fields;
mod render;
mod schema;
pub mod validation;
mod value;

pub use collab::{Navigator, RichTextEditor, Uploader};
pub use engine::{
    Banner, ChangeCallback, FieldChange, FormEngine, FormEngineBuilder, FormState,
    SubmitOutcome, SuccessCallback, DEFAULT_SUCCESS_MESSAGE, REDIRECT_DELAY, UPLOAD_FAILED,
};
pub use error::{FormError, Result, ValidationErrors};
pub use render::{html_escape, render_field, render_form};
pub use schema::{FieldKind, FieldSchema, FormBuilder, FormSchema, InputType, SelectOption};
pub use validation::{validate_field, validate_form, FieldValidity, FormValidity};
pub use value::FieldValue;

//! Field constructors for the common control kinds.

mod checkbox;
mod select;
mod text;
mod upload;

pub use checkbox::toggle_field;
pub use select::choice_field;
pub use text::{email_field, password_field, text_field, textarea_field, url_field};
pub use upload::{array_field, file_field, image_field, rich_text_field};

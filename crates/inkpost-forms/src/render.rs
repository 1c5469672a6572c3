//! Bootstrap 5 rendering of form state.

use ironhtml::html;
use ironhtml::typed::Element;
use ironhtml_elements::Div;
use inkpost_fetch::Method;

use crate::engine::{Banner, FormState};
use crate::schema::{FieldKind, FieldSchema, FormSchema, InputType, SelectOption};
use crate::value::FieldValue;

/// Escapes HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Renders one field with its label and inline error.
pub fn render_field(field: &FieldSchema, value: &FieldValue, error: Option<&str>) -> String {
    let id = format!("id_{}", field.name);
    let invalid = if error.is_some() { " is-invalid" } else { "" };

    let required_marker = if field.required { " *" } else { "" };
    let label_text = format!("{}{}", field.label, required_marker);

    let control = match &field.kind {
        FieldKind::Text(input_type) => text_input(field, &id, *input_type, value, invalid),
        FieldKind::TextArea { rows } => textarea(field, &id, *rows, value, invalid),
        FieldKind::Select { options } => select(field, &id, options, value, invalid),
        FieldKind::Toggle => switch(field, &id, &label_text, value, invalid),
        FieldKind::File { accept } => file_input(field, &id, accept.as_deref(), value, invalid),
        FieldKind::Array => item_list(field, &id, value, invalid),
        FieldKind::RichText => format!(
            r#"<div class="rich-text-editor{invalid}" id="{id}" data-field="{}"></div>"#,
            html_escape(&field.name)
        ),
    };

    let label_el = html! {
        label.for_(#id).class("form-label") { #label_text }
    };

    html! { div.class("mb-3") }
        .when(field.kind != FieldKind::Toggle, |d| d.raw(label_el.render()))
        .raw(&control)
        .children(error, |error, div: Element<Div>| {
            div.class("invalid-feedback").text(error)
        })
        .render()
}

/// Renders a complete form.
///
/// `busy` disables the submit button, for disabled forms and while a
/// submission is in flight.
pub fn render_form(
    schema: &FormSchema,
    state: &FormState,
    action: &str,
    method: Method,
    banner: Option<&Banner>,
    busy: bool,
) -> String {
    let method = method.as_str();
    let mut form = html! {
        form.action(#action).method(#method).class("row")
    };

    if let Some(banner) = banner {
        let (class, message) = match banner {
            Banner::Success(message) => ("alert alert-success", message),
            Banner::Failure(message) => ("alert alert-danger", message),
        };
        form = form.child::<Div, _>(|d| d.class(class).attr("role", "alert").text(message));
    }

    for field in schema.fields() {
        let empty = field.kind.empty_value();
        let value = state.values.get(&field.name).unwrap_or(&empty);
        let field_html = render_field(field, value, state.errors.get(&field.name));
        let column = if field.col_span { "col-12" } else { "col-md-6" };
        form = form.child::<Div, _>(|d| d.class(column).raw(&field_html));
    }

    form = form.child::<Div, _>(|d| {
        let btn = html! {
            button.type_("submit").class("btn btn-primary") {
                "Submit"
            }
        };
        d.class("col-12")
            .raw(btn.when(busy, |b| b.attr("disabled", "disabled")).render())
    });

    form.render()
}

fn common_attrs(field: &FieldSchema) -> String {
    let mut attrs = String::new();
    if let Some(placeholder) = &field.placeholder {
        attrs.push_str(&format!(r#" placeholder="{}""#, html_escape(placeholder)));
    }
    if field.required {
        attrs.push_str(" required");
    }
    if field.autofocus {
        attrs.push_str(" autofocus");
    }
    attrs
}

fn length_attrs(field: &FieldSchema) -> String {
    let min = field
        .min_length
        .map(|n| format!(r#" minlength="{n}""#))
        .unwrap_or_default();
    let max = field
        .max_length
        .map(|n| format!(r#" maxlength="{n}""#))
        .unwrap_or_default();
    format!("{min}{max}")
}

fn text_input(
    field: &FieldSchema,
    id: &str,
    input_type: InputType,
    value: &FieldValue,
    invalid: &str,
) -> String {
    format!(
        r#"<input type="{}" class="form-control{invalid}" id="{id}" name="{}" value="{}"{}{}>"#,
        input_type.as_str(),
        html_escape(&field.name),
        html_escape(value.as_str().unwrap_or_default()),
        length_attrs(field),
        common_attrs(field),
    )
}

fn textarea(field: &FieldSchema, id: &str, rows: usize, value: &FieldValue, invalid: &str) -> String {
    format!(
        r#"<textarea class="form-control{invalid}" id="{id}" name="{}" rows="{rows}"{}{}>{}</textarea>"#,
        html_escape(&field.name),
        length_attrs(field),
        common_attrs(field),
        html_escape(value.as_str().unwrap_or_default()),
    )
}

fn select(
    field: &FieldSchema,
    id: &str,
    options: &[SelectOption],
    value: &FieldValue,
    invalid: &str,
) -> String {
    let current = value.as_str().unwrap_or_default();

    let mut html = String::from(r#"<option value="">---------</option>"#);
    for option in options {
        let selected = if option.value == current { " selected" } else { "" };
        html.push_str(&format!(
            r#"<option value="{}"{selected}>{}</option>"#,
            html_escape(&option.value),
            html_escape(&option.label)
        ));
    }

    format!(
        r#"<select class="form-select{invalid}" id="{id}" name="{}"{}>{html}</select>"#,
        html_escape(&field.name),
        common_attrs(field),
    )
}

fn switch(field: &FieldSchema, id: &str, label: &str, value: &FieldValue, invalid: &str) -> String {
    let checked = if value.as_bool() == Some(true) {
        " checked"
    } else {
        ""
    };

    format!(
        r#"<div class="form-check form-switch">
  <input class="form-check-input{invalid}" type="checkbox" role="switch" id="{id}" name="{}" value="true"{checked}{}>
  <label class="form-check-label" for="{id}">{}</label>
</div>"#,
        html_escape(&field.name),
        common_attrs(field),
        html_escape(label)
    )
}

fn file_input(
    field: &FieldSchema,
    id: &str,
    accept: Option<&str>,
    value: &FieldValue,
    invalid: &str,
) -> String {
    let accept_attr = accept
        .map(|a| format!(r#" accept="{}""#, html_escape(a)))
        .unwrap_or_default();

    // The uploaded URL travels in a hidden input; the picker itself holds no value.
    let url = value.as_str().unwrap_or_default();
    let preview = if url.is_empty() {
        String::new()
    } else {
        format!(
            r#"<img src="{}" class="img-thumbnail mt-2" alt="">"#,
            html_escape(url)
        )
    };

    format!(
        r#"<input type="file" class="form-control{invalid}" id="{id}"{accept_attr}{}><input type="hidden" name="{}" value="{}">{preview}"#,
        common_attrs(field),
        html_escape(&field.name),
        html_escape(url),
    )
}

fn item_list(field: &FieldSchema, id: &str, value: &FieldValue, invalid: &str) -> String {
    let items: String = value
        .as_list()
        .unwrap_or_default()
        .iter()
        .map(|item| {
            let item = html_escape(item);
            format!(
                r#"<li class="list-inline-item badge text-bg-secondary">{item} <button type="button" class="btn-close btn-close-white" aria-label="Remove {item}" data-item="{item}"></button></li>"#
            )
        })
        .collect();

    format!(
        r#"<input type="text" class="form-control{invalid}" id="{id}" data-field="{}"{}><ul class="list-inline mt-2">{items}</ul>"#,
        html_escape(&field.name),
        common_attrs(field),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationErrors;
    use crate::fields::{
        array_field, choice_field, email_field, image_field, rich_text_field, textarea_field,
        toggle_field,
    };
    use crate::schema::FormBuilder;
    use std::collections::HashMap;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_render_text_field() {
        let field = email_field("email", "Email", true).min_length(6).autofocus();
        let html = render_field(&field, &FieldValue::from("sam@example.com"), None);

        assert!(html.contains("form-label"));
        assert!(html.contains("Email *"));
        assert!(html.contains(r#"type="email""#));
        assert!(html.contains(r#"value="sam@example.com""#));
        assert!(html.contains(r#"minlength="6""#));
        assert!(html.contains("autofocus"));
        assert!(!html.contains("is-invalid"));
    }

    #[test]
    fn test_render_field_with_error() {
        let field = textarea_field("body", "Body", 5, true).placeholder("Post a response...");
        let html = render_field(
            &field,
            &FieldValue::from("<b>"),
            Some("Please fill out this field."),
        );

        assert!(html.contains("is-invalid"));
        assert!(html.contains("invalid-feedback"));
        assert!(html.contains("Please fill out this field."));
        assert!(html.contains(r#"rows="5""#));
        assert!(html.contains("&lt;b&gt;</textarea>"));
        assert!(html.contains(r#"placeholder="Post a response...""#));
    }

    #[test]
    fn test_render_each_kind() {
        let select = choice_field("status", "Status", vec![("draft", "Draft")], false);
        assert!(render_field(&select, &FieldValue::from("draft"), None)
            .contains(r#"<option value="draft" selected>Draft</option>"#));

        let toggle = toggle_field("published", "Publish");
        let html = render_field(&toggle, &FieldValue::Bool(true), None);
        assert!(html.contains("form-switch"));
        assert!(html.contains(" checked"));
        assert!(!html.contains("form-label"));

        let tags = array_field("tags", "Tags");
        let html = render_field(&tags, &FieldValue::List(vec!["rust".into()]), None);
        assert!(html.contains(r#"data-item="rust""#));

        let image = image_field("cover", "Cover");
        let html = render_field(&image, &FieldValue::from("https://cdn.test/a.png"), None);
        assert!(html.contains(r#"accept="image/*""#));
        assert!(html.contains(r#"<img src="https://cdn.test/a.png""#));

        let content = rich_text_field("content", "Content");
        assert!(render_field(&content, &FieldValue::from(""), None).contains("rich-text-editor"));
    }

    #[test]
    fn test_render_form() {
        let schema = FormBuilder::new()
            .field(email_field("email", "Email", true).col_span())
            .build()
            .unwrap();
        let mut errors = ValidationErrors::new();
        errors.set("email", "Please enter an email address.");
        let state = FormState {
            values: HashMap::from([("email".to_string(), FieldValue::from("nope"))]),
            errors,
        };

        let html = render_form(
            &schema,
            &state,
            "/api/login",
            Method::Post,
            Some(&Banner::Failure("Invalid credentials".to_string())),
            true,
        );

        assert!(html.contains(r#"action="/api/login""#));
        assert!(html.contains(r#"method="POST""#));
        assert!(html.contains("alert alert-danger"));
        assert!(html.contains("Invalid credentials"));
        assert!(html.contains("col-12"));
        assert!(html.contains("Please enter an email address."));
        assert!(html.contains("disabled"));
        assert!(html.contains("Submit"));
    }
}

//! The form engine: state, input handling and submission.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use inkpost_auth::SessionStore;
use inkpost_fetch::{
    error_message_from, ErrorExtractor, FetchConfig, Method, RequestState, ReqwestTransport,
    ResourceFetcher, Transport,
};
use serde_json::{Map, Value};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::collab::{Navigator, RichTextEditor, Uploader};
use crate::error::{FormError, Result, ValidationErrors};
use crate::render::render_form;
use crate::schema::{FieldKind, FieldSchema, FormSchema};
use crate::validation::{validate_field, validate_form, FieldValidity, PASSWORD_FIELD};
use crate::value::FieldValue;

/// How long the success banner stays up before a configured redirect.
pub const REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// Error shown on a file field whose upload failed.
pub const UPLOAD_FAILED: &str = "Image upload failed.";

/// Banner text after a successful submission, unless overridden.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Success!";

/// One field's new value, as passed to the change callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    /// Field name.
    pub name: String,
    /// New value.
    pub value: FieldValue,
}

/// Called after every value change.
pub type ChangeCallback = Arc<dyn Fn(&FieldChange) + Send + Sync>;

/// Called with the response data of a successful submission.
pub type SuccessCallback = Arc<dyn Fn(&Value) + Send + Sync>;

/// The message shown above the form for the latest submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    /// The submission succeeded.
    Success(String),
    /// The submission failed.
    Failure(String),
}

/// What [`FormEngine::submit`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The form is disabled; nothing happened.
    Disabled,
    /// Validation failed; carries every field's message. Nothing was sent.
    Invalid(HashMap<String, String>),
    /// The request was made (or failed before leaving) with this result.
    Sent(RequestState<Value>),
}

/// Current values and messages, one entry per field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    /// Values keyed by field name.
    pub values: HashMap<String, FieldValue>,
    /// Messages keyed by field name.
    pub errors: ValidationErrors,
}

impl FormState {
    fn empty(schema: &FormSchema) -> Self {
        let mut errors = ValidationErrors::new();
        for field in schema.fields() {
            errors.set(&field.name, "");
        }
        Self {
            values: empty_values(schema),
            errors,
        }
    }
}

fn empty_values(schema: &FormSchema) -> HashMap<String, FieldValue> {
    schema
        .fields()
        .iter()
        .map(|field| (field.name.clone(), field.kind.empty_value()))
        .collect()
}

struct Redirect {
    target: String,
    navigator: Arc<dyn Navigator>,
}

/// Builder for [`FormEngine`].
pub struct FormEngineBuilder {
    schema: FormSchema,
    endpoint: String,
    method: Method,
    error_extractor: Option<ErrorExtractor>,
    on_success: Option<SuccessCallback>,
    on_change: Option<ChangeCallback>,
    redirect: Option<Redirect>,
    disabled: bool,
    success_message: String,
    uploader: Option<Arc<dyn Uploader>>,
    editor: Option<Arc<dyn RichTextEditor>>,
    session: Option<Arc<SessionStore>>,
    transport: Option<Arc<dyn Transport>>,
}

impl std::fmt::Debug for FormEngineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormEngineBuilder")
            .field("schema", &self.schema)
            .field("endpoint", &self.endpoint)
            .field("method", &self.method)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

impl FormEngineBuilder {
    /// Sets the submission method. Defaults to POST.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the extractor for error response bodies.
    #[must_use]
    pub fn error_extractor(mut self, extractor: ErrorExtractor) -> Self {
        self.error_extractor = Some(extractor);
        self
    }

    /// Sets the callback run with the data of a successful submission.
    #[must_use]
    pub fn on_success(mut self, callback: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(callback));
        self
    }

    /// Sets the callback run after every value change.
    #[must_use]
    pub fn on_change(mut self, callback: impl Fn(&FieldChange) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Arc::new(callback));
        self
    }

    /// Navigates to `target` a short while after a successful submission.
    #[must_use]
    pub fn redirect(mut self, target: impl Into<String>, navigator: Arc<dyn Navigator>) -> Self {
        self.redirect = Some(Redirect {
            target: target.into(),
            navigator,
        });
        self
    }

    /// Disables submission.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Sets the success banner text.
    #[must_use]
    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = message.into();
        self
    }

    /// Sets the uploader used by file fields.
    #[must_use]
    pub fn uploader(mut self, uploader: Arc<dyn Uploader>) -> Self {
        self.uploader = Some(uploader);
        self
    }

    /// Sets the editor backing the rich-text field.
    #[must_use]
    pub fn editor(mut self, editor: Arc<dyn RichTextEditor>) -> Self {
        self.editor = Some(editor);
        self
    }

    /// Attaches the session whose token authorizes submissions.
    #[must_use]
    pub fn session(mut self, session: Arc<SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    /// Replaces the default `reqwest` transport.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds the engine with every field at its empty value.
    pub fn build(self) -> FormEngine {
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::new()));
        let state = FormState::empty(&self.schema);

        FormEngine {
            inner: Arc::new(Inner {
                schema: self.schema,
                endpoint: self.endpoint,
                method: self.method,
                error_extractor: self.error_extractor,
                on_success: self.on_success,
                on_change: self.on_change,
                redirect: self.redirect,
                disabled: self.disabled,
                success_message: self.success_message,
                uploader: self.uploader,
                editor: self.editor,
                session: self.session,
                fetcher: ResourceFetcher::new(transport),
                state: Mutex::new(state),
            }),
        }
    }
}

struct Inner {
    schema: FormSchema,
    endpoint: String,
    method: Method,
    error_extractor: Option<ErrorExtractor>,
    on_success: Option<SuccessCallback>,
    on_change: Option<ChangeCallback>,
    redirect: Option<Redirect>,
    disabled: bool,
    success_message: String,
    uploader: Option<Arc<dyn Uploader>>,
    editor: Option<Arc<dyn RichTextEditor>>,
    session: Option<Arc<SessionStore>>,
    fetcher: ResourceFetcher<Value>,
    state: Mutex<FormState>,
}

/// A form bound to an endpoint.
///
/// Clones are handles to the same form. The state lock is never held while
/// a callback runs or a future is awaited.
#[derive(Clone)]
pub struct FormEngine {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for FormEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormEngine")
            .field("endpoint", &self.inner.endpoint)
            .field("method", &self.inner.method)
            .field("fields", &self.inner.schema.len())
            .finish_non_exhaustive()
    }
}

impl FormEngine {
    /// Starts building a form that submits to `endpoint`.
    pub fn builder(schema: FormSchema, endpoint: impl Into<String>) -> FormEngineBuilder {
        FormEngineBuilder {
            schema,
            endpoint: endpoint.into(),
            method: Method::Post,
            error_extractor: None,
            on_success: None,
            on_change: None,
            redirect: None,
            disabled: false,
            success_message: DEFAULT_SUCCESS_MESSAGE.to_string(),
            uploader: None,
            editor: None,
            session: None,
            transport: None,
        }
    }

    /// Returns the schema.
    pub fn schema(&self) -> &FormSchema {
        &self.inner.schema
    }

    /// Returns whether submission is disabled.
    pub fn is_disabled(&self) -> bool {
        self.inner.disabled
    }

    /// Returns a snapshot of every value.
    pub fn values(&self) -> HashMap<String, FieldValue> {
        self.lock().values.clone()
    }

    /// Returns the value of one field.
    pub fn value(&self, name: &str) -> Option<FieldValue> {
        self.lock().values.get(name).cloned()
    }

    /// Returns a snapshot of every message.
    pub fn errors(&self) -> ValidationErrors {
        self.lock().errors.clone()
    }

    /// Returns the state of the latest submission; `None` before the first.
    pub fn state(&self) -> Option<RequestState<Value>> {
        self.inner.fetcher.state()
    }

    /// Returns whether a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.state().is_some_and(|state| state.is_pending())
    }

    /// Returns the banner for the latest submission.
    pub fn banner(&self) -> Option<Banner> {
        match self.state()? {
            RequestState::Succeeded(_) => Some(Banner::Success(self.inner.success_message.clone())),
            RequestState::Failed(message) => Some(Banner::Failure(message)),
            RequestState::Pending => None,
        }
    }

    /// Sets a field's value and clears its message.
    ///
    /// The value must have the type the field's kind stores. Rich-text
    /// content cannot be set; it is read from the editor on submit.
    pub fn input(&self, name: &str, value: impl Into<FieldValue>) -> Result<()> {
        let field = self.field(name)?;
        let value = value.into();

        if !field.kind.accepts(&value) {
            return Err(FormError::InvalidValue {
                field: name.to_string(),
                message: match field.kind {
                    FieldKind::RichText => "rich-text content comes from the editor".to_string(),
                    _ => format!("{value:?} does not fit a {:?} field", field.kind),
                },
            });
        }

        self.change(name, value);
        Ok(())
    }

    /// Appends an item to an array field.
    ///
    /// The input is trimmed and lowercased. Empty input and items already in
    /// the list are ignored; returns whether the item was added.
    pub fn commit_item(&self, name: &str, raw: &str) -> Result<bool> {
        self.array_field(name)?;

        let item = raw.trim().to_lowercase();
        if item.is_empty() {
            return Ok(false);
        }

        let mut items = self.items(name);
        if items.contains(&item) {
            debug!(field = name, item = %item, "ignoring duplicate item");
            return Ok(false);
        }
        items.push(item);

        self.change(name, FieldValue::List(items));
        Ok(true)
    }

    /// Removes an item from an array field.
    pub fn remove_item(&self, name: &str, item: &str) -> Result<()> {
        self.array_field(name)?;

        let mut items = self.items(name);
        items.retain(|existing| existing != item);

        self.change(name, FieldValue::List(items));
        Ok(())
    }

    /// Uploads a selected file in the background.
    ///
    /// On success the field's value becomes the uploaded file's URL; on
    /// failure only that field's message is set. Must be called inside a
    /// Tokio runtime.
    pub fn select_file(
        &self,
        name: &str,
        bytes: Vec<u8>,
        filename: impl Into<String>,
    ) -> Result<JoinHandle<()>> {
        let field = self.field(name)?;
        if !matches!(field.kind, FieldKind::File { .. }) {
            return Err(FormError::InvalidValue {
                field: name.to_string(),
                message: "not a file field".to_string(),
            });
        }
        let uploader = self
            .inner
            .uploader
            .clone()
            .ok_or(FormError::MissingCollaborator("uploader"))?;

        let engine = self.clone();
        let name = name.to_string();
        let filename = filename.into();

        Ok(tokio::spawn(async move {
            debug!(field = %name, file = %filename, "uploading");
            match uploader.upload(bytes, filename).await {
                Ok(url) => engine.change(&name, FieldValue::Text(url)),
                Err(err) => {
                    warn!(field = %name, error = %err, "upload failed");
                    engine.lock().errors.set(&name, UPLOAD_FAILED);
                }
            }
        }))
    }

    /// Validates one field, as when it loses focus.
    pub fn blur(&self, name: &str) -> Result<FieldValidity> {
        let field = self.field(name)?;

        let mut state = self.lock();
        let password = state
            .values
            .get(PASSWORD_FIELD)
            .and_then(FieldValue::as_str)
            .map(str::to_string);
        let empty = field.kind.empty_value();
        let value = state.values.get(name).unwrap_or(&empty);

        let validity = validate_field(field, value, password.as_deref());
        state.errors.set(name, validity.message.clone());
        Ok(validity)
    }

    /// Validates and submits the form.
    pub async fn submit(&self) -> SubmitOutcome {
        if self.inner.disabled {
            debug!(endpoint = %self.inner.endpoint, "submit ignored, form disabled");
            return SubmitOutcome::Disabled;
        }

        let values = {
            let mut state = self.lock();
            let validity = validate_form(&self.inner.schema, &state.values);
            if !validity.valid {
                for (name, message) in &validity.messages {
                    state.errors.set(name, message.clone());
                }
                debug!(errors = state.errors.len(), "form invalid, not submitting");
                return SubmitOutcome::Invalid(validity.messages);
            }
            state.values.clone()
        };

        let token = self.inner.session.as_ref().and_then(|session| session.token());

        let mut payload: Map<String, Value> = values
            .into_iter()
            .map(|(name, value)| (name, field_json(value)))
            .collect();

        if let (Some(field), Some(editor)) =
            (self.inner.schema.rich_text_field(), &self.inner.editor)
        {
            if let Err(err) = editor.flush_pending_uploads().await {
                warn!(error = %err, "could not flush editor uploads");
                return SubmitOutcome::Sent(self.inner.fetcher.fail(error_message_from(&err)));
            }
            payload.insert(field.name.clone(), Value::String(editor.content()));
        }

        let mut config = FetchConfig::new()
            .method(self.inner.method)
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            config = config.header("Authorization", format!("Bearer {token}"));
        }
        if !payload.is_empty() {
            config = config.body(Value::Object(payload));
        }
        if let Some(extractor) = &self.inner.error_extractor {
            config = config.error_extractor(Arc::clone(extractor));
        }

        let state = self.inner.fetcher.fetch(&self.inner.endpoint, config).await;
        if let RequestState::Succeeded(data) = &state {
            self.after_success(data);
        }
        SubmitOutcome::Sent(state)
    }

    /// Renders the form as Bootstrap 5 HTML.
    pub fn render(&self) -> String {
        let state = self.lock().clone();
        render_form(
            &self.inner.schema,
            &state,
            &self.inner.endpoint,
            self.inner.method,
            self.banner().as_ref(),
            self.inner.disabled || self.is_submitting(),
        )
    }

    fn after_success(&self, data: &Value) {
        info!(endpoint = %self.inner.endpoint, "form submitted");

        if let Some(redirect) = &self.inner.redirect {
            let target = redirect.target.clone();
            let navigator = Arc::clone(&redirect.navigator);
            tokio::spawn(async move {
                tokio::time::sleep(REDIRECT_DELAY).await;
                navigator.navigate(&target);
            });
        }

        if let Some(callback) = &self.inner.on_success {
            callback(data);
        }

        if !self.inner.schema.is_empty() {
            self.lock().values = empty_values(&self.inner.schema);
        }
    }

    fn change(&self, name: &str, value: FieldValue) {
        {
            let mut state = self.lock();
            state.values.insert(name.to_string(), value.clone());
            state.errors.clear(name);
        }

        if let Some(callback) = &self.inner.on_change {
            callback(&FieldChange {
                name: name.to_string(),
                value,
            });
        }
    }

    fn field(&self, name: &str) -> Result<&FieldSchema> {
        self.inner
            .schema
            .get(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    fn array_field(&self, name: &str) -> Result<()> {
        match self.field(name)?.kind {
            FieldKind::Array => Ok(()),
            _ => Err(FormError::InvalidValue {
                field: name.to_string(),
                message: "not an array field".to_string(),
            }),
        }
    }

    fn items(&self, name: &str) -> Vec<String> {
        self.lock()
            .values
            .get(name)
            .and_then(FieldValue::as_list)
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn field_json(value: FieldValue) -> Value {
    match value {
        FieldValue::Text(text) => Value::String(text),
        FieldValue::Bool(flag) => Value::Bool(flag),
        FieldValue::List(items) => Value::Array(items.into_iter().map(Value::String).collect()),
    }
}

//! Capabilities a form borrows from its surroundings.
//!
//! The engine never uploads files, edits rich text or navigates on its own;
//! it calls whichever implementations it was built with.

use inkpost_fetch::BoxFuture;

use crate::error::Result;

/// Uploads a selected file and returns the URL it is served from.
pub trait Uploader: Send + Sync {
    /// Uploads `bytes` under `filename`.
    fn upload(&self, bytes: Vec<u8>, filename: String) -> BoxFuture<'_, Result<String>>;
}

/// The rich-text editor bound to a form's rich-text field.
pub trait RichTextEditor: Send + Sync {
    /// Finishes uploading any images embedded in the content.
    fn flush_pending_uploads(&self) -> BoxFuture<'_, Result<()>>;

    /// Returns the serialized content.
    fn content(&self) -> String;
}

/// Moves the user to another location after a successful submission.
pub trait Navigator: Send + Sync {
    /// Navigates to `target`.
    fn navigate(&self, target: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn navigate(&self, target: &str) {
        self(target);
    }
}

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockEditor, MockUploader, RecordingNavigator};

#[cfg(any(test, feature = "mock"))]
mod mock {
    use std::collections::VecDeque;
    use std::sync::{Mutex, PoisonError};

    use super::{BoxFuture, Navigator, Result, RichTextEditor, Uploader};
    use crate::error::FormError;

    /// Uploader that replays queued results.
    #[derive(Debug, Default)]
    pub struct MockUploader {
        results: Mutex<VecDeque<Result<String>>>,
        uploads: Mutex<Vec<String>>,
    }

    impl MockUploader {
        /// Creates an uploader with nothing queued.
        pub fn new() -> Self {
            Self::default()
        }

        /// Queues a result for the next upload.
        pub fn respond(&self, result: Result<String>) -> &Self {
            self.results
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push_back(result);
            self
        }

        /// Returns the filenames uploaded so far.
        pub fn uploads(&self) -> Vec<String> {
            self.uploads
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl Uploader for MockUploader {
        fn upload(&self, _bytes: Vec<u8>, filename: String) -> BoxFuture<'_, Result<String>> {
            self.uploads
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(filename);
            let result = self
                .results
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front()
                .unwrap_or_else(|| Err(FormError::Upload("no result queued".to_string())));
            Box::pin(async move { result })
        }
    }

    /// Editor with fixed content and an optional flush failure.
    #[derive(Debug, Default)]
    pub struct MockEditor {
        content: String,
        flush_error: Option<String>,
        flushes: Mutex<usize>,
    }

    impl MockEditor {
        /// Creates an editor holding `content`.
        pub fn new(content: impl Into<String>) -> Self {
            Self {
                content: content.into(),
                ..Self::default()
            }
        }

        /// Makes every flush fail with `message`.
        #[must_use]
        pub fn failing(mut self, message: impl Into<String>) -> Self {
            self.flush_error = Some(message.into());
            self
        }

        /// Returns how many times uploads were flushed.
        pub fn flushes(&self) -> usize {
            *self.flushes.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    impl RichTextEditor for MockEditor {
        fn flush_pending_uploads(&self) -> BoxFuture<'_, Result<()>> {
            *self.flushes.lock().unwrap_or_else(PoisonError::into_inner) += 1;
            let result = match &self.flush_error {
                Some(message) => Err(FormError::Editor(message.clone())),
                None => Ok(()),
            };
            Box::pin(async move { result })
        }

        fn content(&self) -> String {
            self.content.clone()
        }
    }

    /// Navigator that records its targets.
    #[derive(Debug, Default)]
    pub struct RecordingNavigator {
        visited: Mutex<Vec<String>>,
    }

    impl RecordingNavigator {
        /// Creates a navigator that has gone nowhere.
        pub fn new() -> Self {
            Self::default()
        }

        /// Returns every target navigated to.
        pub fn visited(&self) -> Vec<String> {
            self.visited
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, target: &str) {
            self.visited
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(target.to_string());
        }
    }
}

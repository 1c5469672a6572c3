//! Uploading images to the blog API.

use inkpost_fetch::BoxFuture;
use inkpost_forms::{FormError, Uploader};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::BlogApi;

/// Posts images as multipart form data and returns the URL they are served
/// from.
#[derive(Debug, Clone)]
pub struct ImageUploader {
    client: reqwest::Client,
    url: String,
}

impl ImageUploader {
    /// Creates an uploader targeting the API's image endpoint.
    pub fn new(api: &BlogApi) -> Self {
        Self::with_client(reqwest::Client::new(), api)
    }

    /// Creates an uploader that uses an existing client.
    pub fn with_client(client: reqwest::Client, api: &BlogApi) -> Self {
        Self {
            client,
            url: api.images(),
        }
    }

    /// Returns the URL images are posted to.
    pub fn endpoint(&self) -> &str {
        &self.url
    }

    async fn send(&self, bytes: Vec<u8>, filename: String) -> Result<String, String> {
        let form = Form::new().part("image", Part::bytes(bytes).file_name(filename));

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP Error: {}", status.as_u16()));
        }

        let body: Value = response.json().await.map_err(|e| e.to_string())?;
        body.get("location")
            .and_then(Value::as_str)
            .filter(|location| !location.is_empty())
            .map(str::to_string)
            .ok_or_else(|| "Invalid server response.".to_string())
    }
}

impl Uploader for ImageUploader {
    fn upload(&self, bytes: Vec<u8>, filename: String) -> BoxFuture<'_, inkpost_forms::Result<String>> {
        Box::pin(async move {
            debug!(url = %self.url, file = %filename, size = bytes.len(), "uploading image");
            match self.send(bytes, filename).await {
                Ok(location) => Ok(location),
                Err(message) => {
                    warn!(url = %self.url, error = %message, "image upload failed");
                    Err(FormError::Upload(message))
                }
            }
        })
    }
}

//! Blog API endpoint URLs.

use crate::config::ApiConfig;

/// Builds the URL of every endpoint the client calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogApi {
    config: ApiConfig,
}

impl BlogApi {
    /// Creates the endpoint builder for `config`.
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    /// Returns the config.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// All posts, newest first.
    pub fn posts(&self) -> String {
        self.config.url("api/posts?sort[createdAt]=desc")
    }

    /// Creating a post.
    pub fn create_post(&self) -> String {
        self.config.url("api/posts")
    }

    /// One post.
    pub fn post(&self, slug: &str) -> String {
        self.config.url(&format!("api/posts/{slug}"))
    }

    /// Comments on a post; POST to add one.
    pub fn post_comments(&self, slug: &str) -> String {
        self.config.url(&format!("api/posts/{slug}/comments"))
    }

    /// One category.
    pub fn category(&self, slug: &str) -> String {
        self.config.url(&format!("api/categories/{slug}"))
    }

    /// Signing up.
    pub fn users(&self) -> String {
        self.config.url("api/users")
    }

    /// Logging in.
    pub fn login(&self) -> String {
        self.config.url("api/login")
    }

    /// Requesting a verification email.
    pub fn verification(&self) -> String {
        self.config.url("api/verification")
    }

    /// Confirming an email with the token it carried.
    pub fn verify(&self, token: &str) -> String {
        self.config.url(&format!("api/verification?token={token}"))
    }

    /// Uploading images.
    pub fn images(&self) -> String {
        self.config.url("api/images")
    }

    /// The rich-text editor's API key.
    pub fn tinymce_key(&self) -> String {
        self.config.url("api/api-keys/tinymce")
    }
}

//! # inkpost-blog
//!
//! The blog API as seen by the client: where it lives, what it returns, and
//! the forms that write to it.
//!
//! This crate provides:
//! - `ApiConfig` and `BlogApi` for endpoint URLs
//! - Response models (`PostData`, `CommentData`, ...)
//! - `extract_error_msg`, the API's error message convention
//! - `BlogClient`, typed reads plus the preconfigured forms
//! - `ImageUploader`, the multipart upload backing file fields
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use inkpost_auth::SessionStore;
//! use inkpost_blog::{ApiConfig, BlogApi, BlogClient, Environment};
//! use inkpost_fetch::ReqwestTransport;
//!
//! # async fn run() -> inkpost_blog::Result<()> {
//! let client = BlogClient::new(
//!     BlogApi::new(ApiConfig::for_environment(Environment::Prod)),
//!     Arc::new(ReqwestTransport::new()),
//!     Arc::new(SessionStore::in_memory()),
//! );
//!
//! for post in client.published_posts().await? {
//!     println!("{} by {}", post.title, post.user.full_name());
//! }
//! # Ok(())
//! # }
//! ```

mod api;
mod client;
mod config;
mod error;
mod extract;
mod models;
pub mod schemas;
mod upload;

pub use api::BlogApi;
pub use client::BlogClient;
pub use config::{ApiConfig, Environment};
pub use error::{BlogError, Result};
pub use extract::{error_extractor, extract_error_msg};
pub use models::{
    ApiResponse, CategoryData, CommentAuthor, CommentData, DisplayImage, PostAuthor,
    PostCategory, PostData,
};
pub use upload::ImageUploader;

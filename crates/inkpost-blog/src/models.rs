//! Shapes of the blog API's responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope around every API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<D> {
    /// Whether the API handled the request.
    #[serde(default)]
    pub success: bool,
    /// Human-readable outcome.
    #[serde(default)]
    pub message: String,
    /// Per-field errors of a rejected request.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Value>,
    /// Total number of items, on listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    /// Payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<D>,
    /// Bearer token, on login and verification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Author of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAuthor {
    /// User id.
    #[serde(rename = "_id")]
    pub id: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Username.
    pub username: String,
    /// URL slug.
    pub slug: String,
}

impl PostAuthor {
    /// Returns "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Category a post is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCategory {
    /// Category id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Name.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Cover image of a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayImage {
    /// Credit line.
    #[serde(default)]
    pub attribution: Option<String>,
    /// Where the image was found.
    #[serde(default)]
    pub source: Option<String>,
    /// Image URL.
    #[serde(default)]
    pub url: Option<String>,
}

/// A blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    /// Post id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Title.
    pub title: String,
    /// URL slug.
    pub slug: String,
    /// HTML content.
    pub content: String,
    /// Author.
    pub user: PostAuthor,
    /// Whether the post is visible to readers.
    pub is_published: bool,
    /// Category.
    #[serde(default)]
    pub category: Option<PostCategory>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Cover image.
    #[serde(default, rename = "displayImg")]
    pub display_img: Option<DisplayImage>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl PostData {
    /// Returns whether the post is filed under the category `slug`.
    pub fn in_category(&self, slug: &str) -> bool {
        self.category.as_ref().is_some_and(|c| c.slug == slug)
    }

    /// Returns whether the post was written by the user `slug`.
    pub fn by_author(&self, slug: &str) -> bool {
        self.user.slug == slug
    }

    /// Returns the cover image URL, if any.
    pub fn image_url(&self) -> Option<&str> {
        self.display_img.as_ref()?.url.as_deref()
    }
}

/// A category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryData {
    /// Category id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Name.
    pub name: String,
    /// URL slug.
    pub slug: String,
}

/// Author of a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAuthor {
    /// User id.
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    /// Username.
    pub username: String,
}

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentData {
    /// Comment id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Comment text.
    pub text: String,
    /// Author.
    pub user: CommentAuthor,
    /// Id of the post commented on.
    #[serde(default)]
    pub post: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

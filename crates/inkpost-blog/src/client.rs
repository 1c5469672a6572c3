//! Typed access to the blog API.

use std::sync::Arc;

use inkpost_auth::{SessionData, SessionStore};
use inkpost_fetch::{FetchConfig, Method, RequestState, ResourceFetcher, Transport};
use inkpost_forms::{FormEngine, FormEngineBuilder, FormSchema, RichTextEditor};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

use crate::api::BlogApi;
use crate::error::{BlogError, Result};
use crate::extract::error_extractor;
use crate::models::{ApiResponse, CategoryData, CommentData, PostData};
use crate::schemas::{
    become_author_schema, comment_schema, create_post_schema, login_schema, signup_schema,
};
use crate::upload::ImageUploader;

/// Reads from the blog API and prepares its forms.
///
/// Every request carries the session's bearer token when one is live.
#[derive(Clone)]
pub struct BlogClient {
    api: BlogApi,
    transport: Arc<dyn Transport>,
    session: Arc<SessionStore>,
}

impl std::fmt::Debug for BlogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogClient")
            .field("api", &self.api)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl BlogClient {
    /// Creates a client.
    pub fn new(api: BlogApi, transport: Arc<dyn Transport>, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            transport,
            session,
        }
    }

    /// Returns the endpoint builder.
    pub fn api(&self) -> &BlogApi {
        &self.api
    }

    /// Returns the session.
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Every post, newest first, published or not.
    pub async fn posts(&self) -> Result<Vec<PostData>> {
        self.data(&self.api.posts(), self.config()).await
    }

    /// Published posts, newest first.
    pub async fn published_posts(&self) -> Result<Vec<PostData>> {
        Ok(self
            .posts()
            .await?
            .into_iter()
            .filter(|post| post.is_published)
            .collect())
    }

    /// Published posts filed under the category `slug`.
    pub async fn posts_in_category(&self, slug: &str) -> Result<Vec<PostData>> {
        Ok(self
            .published_posts()
            .await?
            .into_iter()
            .filter(|post| post.in_category(slug))
            .collect())
    }

    /// Published posts written by the user `slug`.
    pub async fn posts_by_author(&self, slug: &str) -> Result<Vec<PostData>> {
        Ok(self
            .published_posts()
            .await?
            .into_iter()
            .filter(|post| post.by_author(slug))
            .collect())
    }

    /// One post.
    pub async fn post(&self, slug: &str) -> Result<PostData> {
        self.data(&self.api.post(slug), self.config()).await
    }

    /// Comments on a post.
    pub async fn comments(&self, slug: &str) -> Result<Vec<CommentData>> {
        self.data(&self.api.post_comments(slug), self.config()).await
    }

    /// One category.
    pub async fn category(&self, slug: &str) -> Result<CategoryData> {
        self.data(&self.api.category(slug), self.config()).await
    }

    /// The rich-text editor's API key.
    pub async fn tinymce_api_key(&self) -> Result<String> {
        self.data(&self.api.tinymce_key(), self.config()).await
    }

    /// Confirms an email address and logs in with the token the API returns.
    pub async fn verify_email(&self, token: &str) -> Result<SessionData> {
        let response: ApiResponse<Value> = self
            .request(&self.api.verify(token), self.config().method(Method::Patch))
            .await?;

        let token = response.token.ok_or_else(|| {
            BlogError::InvalidResponse("verification response carries no token".to_string())
        })?;
        let data = self.session.login_with_token(&token)?;
        info!(user_id = %data.user_id, "email verified");
        Ok(data)
    }

    /// Account creation form; submits to the users endpoint.
    pub fn signup_form(&self) -> Result<FormEngineBuilder> {
        Ok(self
            .form(signup_schema()?, self.api.users())
            .success_message("Success!"))
    }

    /// Login form; a successful submission logs the session in.
    pub fn login_form(&self) -> Result<FormEngineBuilder> {
        let session = Arc::clone(&self.session);
        Ok(self
            .form(login_schema()?, self.api.login())
            .success_message("You are now logged in.")
            .on_success(move |data| {
                if let Err(err) = session.login(data) {
                    warn!(error = %err, "login response not usable");
                }
            }))
    }

    /// Comment form for the post `slug`.
    pub fn comment_form(&self, slug: &str) -> Result<FormEngineBuilder> {
        Ok(self
            .form(comment_schema()?, self.api.post_comments(slug))
            .success_message("Success!"))
    }

    /// Post creation form whose content comes from `editor`.
    ///
    /// Images embedded in the content are the editor's to upload, usually
    /// through [`image_uploader`](Self::image_uploader), when the form
    /// flushes it on submit.
    pub fn create_post_form(&self, editor: Arc<dyn RichTextEditor>) -> Result<FormEngineBuilder> {
        Ok(self
            .form(create_post_schema()?, self.api.create_post())
            .editor(editor))
    }

    /// Uploader for the API's image endpoint.
    pub fn image_uploader(&self) -> ImageUploader {
        ImageUploader::new(&self.api)
    }

    /// Asks for a verification email granting author access.
    pub fn become_author_form(&self) -> FormEngineBuilder {
        self.form(become_author_schema(), self.api.verification())
            .success_message("Verification email sent!")
    }

    fn form(&self, schema: FormSchema, endpoint: String) -> FormEngineBuilder {
        FormEngine::builder(schema, endpoint)
            .method(Method::Post)
            .error_extractor(error_extractor())
            .transport(Arc::clone(&self.transport))
            .session(Arc::clone(&self.session))
    }

    fn config(&self) -> FetchConfig {
        let config = FetchConfig::new().error_extractor(error_extractor());
        match self.session.token() {
            Some(token) => config.header("Authorization", format!("Bearer {token}")),
            None => config,
        }
    }

    async fn data<D>(&self, url: &str, config: FetchConfig) -> Result<D>
    where
        D: DeserializeOwned + Clone,
    {
        self.request::<D>(url, config).await?.data.ok_or_else(|| {
            BlogError::InvalidResponse(format!("no data in response from {url}"))
        })
    }

    async fn request<D>(&self, url: &str, config: FetchConfig) -> Result<ApiResponse<D>>
    where
        D: DeserializeOwned + Clone,
    {
        let fetcher: ResourceFetcher<ApiResponse<D>> =
            ResourceFetcher::new(Arc::clone(&self.transport));

        match fetcher.fetch(url, config).await {
            RequestState::Succeeded(response) => Ok(response),
            RequestState::Failed(message) => Err(BlogError::Request(message)),
            RequestState::Pending => Err(BlogError::Request(format!(
                "request to {url} did not complete"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use inkpost_auth::unsigned_token;
    use inkpost_fetch::{HttpResponse, MockTransport};
    use inkpost_forms::collab::MockEditor;
    use serde_json::json;

    fn post(slug: &str, published: bool, category: &str, author: &str) -> Value {
        json!({
            "_id": format!("id-{slug}"),
            "title": slug,
            "slug": slug,
            "content": "<p>Hello</p>",
            "user": {
                "_id": "u1",
                "firstName": "Sam",
                "lastName": "Smith",
                "username": author,
                "slug": author
            },
            "isPublished": published,
            "category": {"_id": "c1", "name": category, "slug": category},
            "createdAt": "2024-05-01T12:00:00Z",
            "updatedAt": "2024-05-01T12:00:00Z"
        })
    }

    fn client(transport: &Arc<MockTransport>) -> BlogClient {
        BlogClient::new(
            BlogApi::new(ApiConfig::new("http://api.test").unwrap()),
            transport.clone(),
            Arc::new(SessionStore::in_memory()),
        )
    }

    fn listing() -> HttpResponse {
        HttpResponse::json(
            200,
            &json!({
                "success": true,
                "count": 4,
                "data": [
                    post("one", true, "tech", "sam"),
                    post("two", false, "tech", "sam"),
                    post("three", true, "life", "alex"),
                    post("four", true, "tech", "alex")
                ]
            }),
        )
    }

    fn slugs(posts: &[PostData]) -> Vec<&str> {
        posts.iter().map(|p| p.slug.as_str()).collect()
    }

    #[tokio::test]
    async fn test_listings_filter_published_posts() {
        let transport = Arc::new(MockTransport::new());
        transport.reply(listing()).reply(listing()).reply(listing());
        let client = client(&transport);

        assert_eq!(
            slugs(&client.published_posts().await.unwrap()),
            ["one", "three", "four"]
        );
        assert_eq!(
            slugs(&client.posts_in_category("tech").await.unwrap()),
            ["one", "four"]
        );
        assert_eq!(slugs(&client.posts_by_author("alex").await.unwrap()), ["three", "four"]);

        let request = &transport.requests()[0];
        assert_eq!(request.url, "http://api.test/api/posts?sort[createdAt]=desc");
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.get_header("Authorization"), None);
    }

    #[tokio::test]
    async fn test_failure_uses_api_message() {
        let transport = Arc::new(MockTransport::new());
        transport.reply(HttpResponse::json(
            404,
            &json!({"success": false, "message": "Post not found"}),
        ));

        let err = client(&transport).post("missing").await.unwrap_err();
        assert!(matches!(err, BlogError::Request(message) if message == "Post not found"));
    }

    #[tokio::test]
    async fn test_verify_email_logs_in() {
        let token = unsigned_token(&json!({
            "id": "u1",
            "isVerified": true,
            "iat": 1_700_000_000,
            "exp": 4_000_000_000_i64
        }));
        let transport = Arc::new(MockTransport::new());
        transport
            .reply(HttpResponse::json(
                200,
                &json!({"success": true, "message": "Email verified", "token": token}),
            ))
            .reply(HttpResponse::json(200, &json!({"success": true, "data": []})));
        let client = client(&transport);

        let data = client.verify_email("mail-token").await.unwrap();
        assert!(data.is_verified);
        assert!(client.session().is_logged_in());

        client.comments("hello").await.unwrap();
        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::Patch);
        assert_eq!(
            requests[0].url,
            "http://api.test/api/verification?token=mail-token"
        );
        assert_eq!(
            requests[1].get_header("Authorization"),
            Some(format!("Bearer {token}").as_str())
        );
    }

    #[tokio::test]
    async fn test_verify_email_without_token() {
        let transport = Arc::new(MockTransport::new());
        transport.reply(HttpResponse::json(200, &json!({"success": true})));

        let err = client(&transport).verify_email("t").await.unwrap_err();
        assert!(matches!(err, BlogError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_signup_form_surfaces_api_errors() {
        let transport = Arc::new(MockTransport::new());
        transport.reply(HttpResponse::json(
            400,
            &json!({"success": false, "errors": [{"msg": "Email taken"}]}),
        ));
        let form = client(&transport).signup_form().unwrap().build();
        for (name, value) in [
            ("firstName", "Sam"),
            ("lastName", "Smith"),
            ("username", "sam.smith"),
            ("email", "sam@example.com"),
            ("password", "password123"),
            ("confirmPassword", "password123"),
        ] {
            form.input(name, value).unwrap();
        }

        form.submit().await;

        assert_eq!(
            form.banner(),
            Some(inkpost_forms::Banner::Failure("Email taken".to_string()))
        );
        assert_eq!(transport.requests()[0].url, "http://api.test/api/users");
    }

    #[tokio::test]
    async fn test_create_post_sends_editor_content() {
        let transport = Arc::new(MockTransport::new());
        transport.reply(HttpResponse::json(201, &json!({"success": true})));
        let client = client(&transport);
        let editor = Arc::new(MockEditor::new("<p>Hello</p>"));
        let form = client.create_post_form(editor.clone()).unwrap().build();
        form.input("title", "First post").unwrap();

        form.submit().await;

        assert_eq!(editor.flushes(), 1);
        let request = &transport.requests()[0];
        assert_eq!(request.url, "http://api.test/api/posts");
        assert_eq!(
            request.body_json::<Value>(),
            Some(json!({"title": "First post", "content": "<p>Hello</p>"}))
        );
        assert_eq!(client.image_uploader().endpoint(), "http://api.test/api/images");
    }

    #[tokio::test]
    async fn test_become_author_sends_empty_request() {
        let transport = Arc::new(MockTransport::new());
        transport.reply(HttpResponse::json(200, &json!({"success": true})));
        let form = client(&transport).become_author_form().build();

        form.submit().await;

        assert_eq!(
            form.banner(),
            Some(inkpost_forms::Banner::Success(
                "Verification email sent!".to_string()
            ))
        );
        let request = &transport.requests()[0];
        assert_eq!(request.url, "http://api.test/api/verification");
        assert_eq!(request.body, None);
    }
}

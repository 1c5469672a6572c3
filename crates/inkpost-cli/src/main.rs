//! inkpost CLI
//!
//! Command-line client for the blog API.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use inkpost_auth::{FileTokenStore, SessionStore};
use inkpost_blog::{ApiConfig, BlogApi, BlogClient, Environment, PostData};
use inkpost_fetch::{BoxFuture, ReqwestTransport};
use inkpost_forms::{Banner, FormEngine, RichTextEditor, SubmitOutcome, Uploader};

/// Command-line client for the blog API.
#[derive(Parser)]
#[command(name = "inkpost")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// API base URL; overrides --env.
    #[arg(short, long, env = "INKPOST_BASE_URL")]
    base_url: Option<String>,

    /// Deployment to talk to (dev or prod).
    #[arg(short, long, env = "INKPOST_ENV", default_value = "dev")]
    env: Environment,

    /// Bearer token to use instead of the stored session.
    #[arg(short, long, env = "INKPOST_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// File the session token is kept in.
    #[arg(long, env = "INKPOST_TOKEN_FILE", default_value = ".inkpost-token")]
    token_file: PathBuf,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List published posts, newest first.
    Posts {
        /// Only posts in this category.
        #[arg(short, long)]
        category: Option<String>,

        /// Only posts by this author.
        #[arg(short, long)]
        author: Option<String>,

        /// Include unpublished posts.
        #[arg(long, conflicts_with_all = ["category", "author"])]
        all: bool,
    },

    /// Show one post.
    Post {
        /// Post slug.
        slug: String,
    },

    /// List the comments on a post.
    Comments {
        /// Post slug.
        slug: String,
    },

    /// Show a category and its published posts.
    Category {
        /// Category slug.
        slug: String,
    },

    /// Create an account.
    Signup {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Defaults to --password.
        #[arg(long)]
        confirm_password: Option<String>,
    },

    /// Log in and store the session token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Forget the stored session token.
    Logout,

    /// Show who is logged in.
    Whoami,

    /// Confirm an email address with the token from the verification email.
    Verify {
        /// Verification token.
        token: String,
    },

    /// Ask for a verification email to become an author.
    RequestVerification,

    /// Comment on a post.
    Comment {
        /// Post slug.
        slug: String,

        /// Comment text.
        #[arg(long)]
        text: String,
    },

    /// Create a post.
    CreatePost {
        /// Post title.
        #[arg(long)]
        title: String,

        /// File holding the HTML content.
        #[arg(long)]
        content_file: PathBuf,
    },

    /// Upload an image and print the URL it is served from.
    UploadImage {
        /// Image file.
        file: PathBuf,
    },
}

/// Editor stand-in holding content read up front.
struct FileContent {
    content: String,
}

impl RichTextEditor for FileContent {
    fn flush_pending_uploads(&self) -> BoxFuture<'_, inkpost_forms::Result<()>> {
        Box::pin(async { Ok(()) })
    }

    fn content(&self) -> String {
        self.content.clone()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &cli.base_url {
        Some(url) => ApiConfig::new(url.as_str())?,
        None => ApiConfig::for_environment(cli.env),
    };
    debug!(base_url = config.base_url(), "using API");

    let session = Arc::new(session_store(&cli)?);

    let client = BlogClient::new(
        BlogApi::new(config),
        Arc::new(ReqwestTransport::new()),
        session,
    );

    match cli.command {
        Commands::Posts {
            category,
            author,
            all,
        } => {
            let posts = if all {
                client.posts().await?
            } else {
                let mut posts = client.published_posts().await?;
                if let Some(slug) = &category {
                    posts.retain(|post| post.in_category(slug));
                }
                if let Some(slug) = &author {
                    posts.retain(|post| post.by_author(slug));
                }
                posts
            };
            print_posts(&posts);
        }

        Commands::Post { slug } => {
            let post = client.post(&slug).await?;
            println!("{}", post.title);
            println!("{:-<60}", "");
            println!(
                "by {} on {}",
                post.user.full_name(),
                post.created_at.format("%Y-%m-%d")
            );
            if let Some(url) = post.image_url() {
                println!("image: {url}");
            }
            if !post.tags.is_empty() {
                println!("tags: {}", post.tags.join(", "));
            }
            println!("\n{}", post.content);
        }

        Commands::Comments { slug } => {
            let comments = client.comments(&slug).await?;
            if comments.is_empty() {
                info!("There are no comments on this post yet.");
            }
            for comment in &comments {
                println!(
                    "{} says ({}):",
                    comment.user.username,
                    comment.created_at.format("%Y-%m-%d %H:%M")
                );
                println!("  {}\n", comment.text);
            }
        }

        Commands::Category { slug } => {
            let category = client.category(&slug).await?;
            println!("{}", category.name);
            println!("{:-<60}", "");
            let posts = client.posts_in_category(&slug).await?;
            if posts.is_empty() {
                info!("This category doesn't have any published posts.");
            }
            print_posts(&posts);
        }

        Commands::Signup {
            first_name,
            last_name,
            username,
            email,
            confirm_password,
            password,
        } => {
            let form = client.signup_form()?.build();
            let confirm = confirm_password.unwrap_or_else(|| password.clone());
            form.input("firstName", first_name)?;
            form.input("lastName", last_name)?;
            form.input("username", username)?;
            form.input("email", email)?;
            form.input("password", password)?;
            form.input("confirmPassword", confirm)?;
            submit(&form).await?;
        }

        Commands::Login { email, password } => {
            let form = client.login_form()?.build();
            form.input("email", email)?;
            form.input("password", password)?;
            submit(&form).await?;
        }

        Commands::Logout => {
            client.session().logout();
            info!("Logged out.");
        }

        Commands::Whoami => match client.session().current() {
            Some(data) => {
                println!(
                    "{} ({})",
                    data.username.as_deref().unwrap_or("unknown"),
                    data.user_id
                );
                println!("verified: {}", data.is_verified);
                println!("admin: {}", data.is_admin);
                if let Some(expires) = data.expires_at() {
                    println!("expires: {}", expires.format("%Y-%m-%d %H:%M:%S"));
                }
            }
            None => info!("Not logged in."),
        },

        Commands::Verify { token } => {
            let data = client.verify_email(&token).await?;
            info!(
                "Email verified. Logged in as {}.",
                data.username.as_deref().unwrap_or(&data.user_id)
            );
        }

        Commands::RequestVerification => {
            let form = client.become_author_form().build();
            submit(&form).await?;
        }

        Commands::Comment { slug, text } => {
            let form = client.comment_form(&slug)?.build();
            form.input("comment", text)?;
            submit(&form).await?;
        }

        Commands::CreatePost {
            title,
            content_file,
        } => {
            let content = std::fs::read_to_string(&content_file)
                .with_context(|| format!("cannot read {}", content_file.display()))?;
            let form = client
                .create_post_form(Arc::new(FileContent { content }))?
                .build();
            form.input("title", title)?;
            submit(&form).await?;
        }

        Commands::UploadImage { file } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("cannot read {}", file.display()))?;
            let filename = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string());
            let url = client.image_uploader().upload(bytes, filename).await?;
            println!("{url}");
        }
    }

    Ok(())
}

/// A `--token` override lives only for this invocation; the stored login is
/// left as it was.
fn session_store(cli: &Cli) -> anyhow::Result<SessionStore> {
    match &cli.token {
        Some(token) => {
            let session = SessionStore::in_memory();
            session
                .login_with_token(token)
                .context("the --token value is not a usable session token")?;
            Ok(session)
        }
        None => Ok(SessionStore::new(Arc::new(FileTokenStore::new(
            &cli.token_file,
        )))),
    }
}

async fn submit(form: &FormEngine) -> anyhow::Result<()> {
    match form.submit().await {
        SubmitOutcome::Disabled => bail!("this form is disabled"),
        SubmitOutcome::Invalid(messages) => {
            let mut messages: Vec<_> = messages
                .into_iter()
                .filter(|(_, message)| !message.is_empty())
                .collect();
            messages.sort();
            for (field, message) in &messages {
                eprintln!("{field}: {message}");
            }
            bail!("{} field(s) are invalid", messages.len());
        }
        SubmitOutcome::Sent(_) => match form.banner() {
            Some(Banner::Success(message)) => {
                info!("{message}");
                Ok(())
            }
            Some(Banner::Failure(message)) => bail!(message),
            None => Ok(()),
        },
    }
}

fn print_posts(posts: &[PostData]) {
    for post in posts {
        let category = post
            .category
            .as_ref()
            .map(|c| format!(" [{}]", c.name))
            .unwrap_or_default();
        let draft = if post.is_published { "" } else { " (draft)" };
        println!(
            "{}  {}{category}{draft}\n    {} by {}",
            post.created_at.format("%Y-%m-%d"),
            post.title,
            post.slug,
            post.user.username
        );
    }
}

//! Where the blog API lives.

use std::fmt;
use std::str::FromStr;

use crate::error::{BlogError, Result};

/// Deployment the client talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    /// Local API server.
    #[default]
    Dev,
    /// Hosted API.
    Prod,
}

impl Environment {
    /// Returns the API base URL of this deployment.
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Dev => "http://localhost:3000/",
            Self::Prod => "https://blog-api-ma.fly.dev/",
        }
    }
}

impl FromStr for Environment {
    type Err = BlogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Dev),
            "prod" | "production" => Ok(Self::Prod),
            _ => Err(BlogError::InvalidEnvironment(s.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dev => "dev",
            Self::Prod => "prod",
        })
    }
}

/// API location. The base URL always ends with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// Creates a config for an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let mut base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(BlogError::InvalidBaseUrl(base_url));
        }
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(Self { base_url })
    }

    /// Creates a config for a known deployment.
    pub fn for_environment(env: Environment) -> Self {
        Self {
            base_url: env.base_url().to_string(),
        }
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins `path` onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

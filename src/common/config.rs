// src/common/config.rs
//! Environment-driven configuration
//!
//! LinkedIn credentials are optional at startup. A deployment that is missing
//! any of them still boots; the callback reports `server_config_error` and the
//! start route answers 503 instead.

use std::env;
use std::time::Duration;

pub const DEFAULT_AUTHORIZATION_URL: &str = "https://www.linkedin.com/oauth/v2/authorization";
pub const DEFAULT_TOKEN_URL: &str = "https://www.linkedin.com/oauth/v2/accessToken";
pub const DEFAULT_USERINFO_URL: &str = "https://api.linkedin.com/v2/userinfo";
pub const DEFAULT_SCOPE: &str = "openid profile email";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// LinkedIn OAuth client settings
#[derive(Clone)]
pub struct LinkedInConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub authorization_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub scope: String,
    pub http_timeout: Duration,
}

/// Server-held credentials, only available when every field is set
#[derive(Clone)]
pub struct LinkedInCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl std::fmt::Debug for LinkedInCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkedInCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

impl std::fmt::Debug for LinkedInConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkedInConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("redirect_uri", &self.redirect_uri)
            .field("authorization_url", &self.authorization_url)
            .field("token_url", &self.token_url)
            .field("userinfo_url", &self.userinfo_url)
            .field("scope", &self.scope)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl LinkedInConfig {
    pub fn from_env() -> Self {
        let http_timeout_secs = env::var("LINKEDIN_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        Self {
            client_id: non_empty_var("LINKEDIN_CLIENT_ID"),
            client_secret: non_empty_var("LINKEDIN_CLIENT_SECRET"),
            redirect_uri: non_empty_var("LINKEDIN_REDIRECT_URI"),
            authorization_url: non_empty_var("LINKEDIN_AUTHORIZATION_URL")
                .unwrap_or_else(|| DEFAULT_AUTHORIZATION_URL.to_string()),
            token_url: non_empty_var("LINKEDIN_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            userinfo_url: non_empty_var("LINKEDIN_USERINFO_URL")
                .unwrap_or_else(|| DEFAULT_USERINFO_URL.to_string()),
            scope: non_empty_var("LINKEDIN_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            http_timeout: Duration::from_secs(http_timeout_secs),
        }
    }

    /// Returns the full credential set, or `None` if any piece is missing
    pub fn credentials(&self) -> Option<LinkedInCredentials> {
        Some(LinkedInCredentials {
            client_id: self.client_id.clone()?,
            client_secret: self.client_secret.clone()?,
            redirect_uri: self.redirect_uri.clone()?,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.credentials().is_some()
    }
}

/// Top-level application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub linkedin: LinkedInConfig,
    /// Base URL of the landing page; `None` redirects to the relative root
    pub frontend_url: Option<String>,
    pub cookie_secure: bool,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let cookie_secure = env::var("COOKIE_SECURE")
            .map(|v| v.trim().to_lowercase() != "false")
            .unwrap_or(true);

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);

        Self {
            linkedin: LinkedInConfig::from_env(),
            frontend_url: non_empty_var("FRONTEND_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            cookie_secure,
            port,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

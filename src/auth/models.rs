//! LinkedIn OAuth data models

use serde::{Deserialize, Serialize};

/// Name of the anti-forgery cookie set by the start route
pub const STATE_COOKIE: &str = "linkedin_oauth_state";

/// Lifetime of the anti-forgery cookie
pub const STATE_COOKIE_MAX_AGE_MINUTES: i64 = 5;

/// Query parameters LinkedIn appends to the redirect URI
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Callback query as received, with every value of a repeated key kept
#[derive(Debug, Default, Deserialize)]
pub struct RawCallbackParams {
    #[serde(default)]
    pub code: Vec<String>,
    #[serde(default)]
    pub state: Vec<String>,
    #[serde(default)]
    pub error: Vec<String>,
    #[serde(default)]
    pub error_description: Vec<String>,
}

impl From<RawCallbackParams> for CallbackParams {
    /// Keeps the first value of each key
    fn from(raw: RawCallbackParams) -> Self {
        fn first(values: Vec<String>) -> Option<String> {
            values.into_iter().next()
        }

        Self {
            code: first(raw.code),
            state: first(raw.state),
            error: first(raw.error),
            error_description: first(raw.error_description),
        }
    }
}

/// Token endpoint response
///
/// `access_token` is optional so that a 2xx body without one can be reported
/// as `access_token_missing` instead of a decode failure.
#[derive(Deserialize)]
pub struct LinkedInTokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
}

impl std::fmt::Debug for LinkedInTokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkedInTokenResponse")
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .field("token_type", &self.token_type)
            .field("id_token", &self.id_token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// OpenID Connect userinfo payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedInProfile {
    /// Unique LinkedIn member id
    pub sub: String,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
}

/// Error body shapes returned by LinkedIn endpoints
#[derive(Debug, Default, Deserialize)]
pub struct LinkedInErrorBody {
    pub error: Option<String>,
    pub error_description: Option<String>,
    pub message: Option<String>,
}

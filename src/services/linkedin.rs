// src/services/linkedin.rs
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::auth::models::{LinkedInErrorBody, LinkedInProfile, LinkedInTokenResponse};
use crate::common::config::{LinkedInConfig, LinkedInCredentials};
use crate::common::helpers::build_url;

pub const TOKEN_EXCHANGE_FALLBACK: &str = "Failed to obtain access token from LinkedIn.";
pub const PROFILE_FETCH_FALLBACK: &str = "Failed to fetch user profile from LinkedIn.";

#[derive(Debug, Error)]
pub enum LinkedInError {
    #[error("LinkedIn OAuth not configured")]
    NotConfigured,

    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("Token response did not include an access token")]
    AccessTokenMissing,

    #[error("Profile fetch failed: {0}")]
    ProfileFetchFailed(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Which outbound call a transport error belongs to
#[derive(Debug, Clone, Copy)]
enum Call {
    TokenExchange,
    ProfileFetch,
}

/// Client for the LinkedIn token and userinfo endpoints
///
/// Owns the `reqwest::Client` so that a single connection pool, with a bounded
/// timeout, is shared by every callback.
pub struct LinkedInService {
    client: Client,
    config: LinkedInConfig,
}

impl LinkedInService {
    pub fn new(config: LinkedInConfig) -> Result<Self, LinkedInError> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| LinkedInError::RequestFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &LinkedInConfig {
        &self.config
    }

    pub fn credentials(&self) -> Option<LinkedInCredentials> {
        self.config.credentials()
    }

    /// Builds the URL the browser is sent to in order to authorize the app
    pub fn authorization_url(&self, state: &str) -> Result<String, LinkedInError> {
        let client_id = self
            .config
            .client_id
            .as_deref()
            .ok_or(LinkedInError::NotConfigured)?;
        let redirect_uri = self
            .config
            .redirect_uri
            .as_deref()
            .ok_or(LinkedInError::NotConfigured)?;

        Ok(build_url(
            &self.config.authorization_url,
            &[
                ("response_type", "code"),
                ("client_id", client_id),
                ("redirect_uri", redirect_uri),
                ("state", state),
                ("scope", &self.config.scope),
            ],
        ))
    }

    /// Exchanges a single-use authorization code for a bearer token
    ///
    /// Returns only the access token; the rest of the response is logged
    /// (without the token) and dropped.
    pub async fn exchange_code(
        &self,
        credentials: &LinkedInCredentials,
        code: &str,
    ) -> Result<String, LinkedInError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", credentials.redirect_uri.as_str()),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
        ];

        debug!("Exchanging authorization code for access token");

        let response = self
            .client
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| transport_error(Call::TokenExchange, e))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .map_err(|e| transport_error(Call::TokenExchange, e))?;
            let message = token_error_message(&error_text);
            error!(status = %status, error = %message, "LinkedIn token exchange failed");
            return Err(LinkedInError::TokenExchangeFailed(message));
        }

        let token_response = response
            .json::<LinkedInTokenResponse>()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    transport_error(Call::TokenExchange, e)
                } else {
                    LinkedInError::SerializationError(e.to_string())
                }
            })?;

        match token_response.access_token.filter(|t| !t.is_empty()) {
            Some(access_token) => {
                info!(
                    expires_in = ?token_response.expires_in,
                    scope = ?token_response.scope,
                    token_type = ?token_response.token_type,
                    "Obtained LinkedIn access token"
                );
                Ok(access_token)
            }
            None => {
                error!(
                    expires_in = ?token_response.expires_in,
                    scope = ?token_response.scope,
                    "Access token not found in LinkedIn token response"
                );
                Err(LinkedInError::AccessTokenMissing)
            }
        }
    }

    /// Fetches the OpenID Connect profile authorised by `access_token`
    pub async fn fetch_profile(&self, access_token: &str) -> Result<LinkedInProfile, LinkedInError> {
        debug!("Fetching LinkedIn userinfo profile");

        let response = self
            .client
            .get(&self.config.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| transport_error(Call::ProfileFetch, e))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .map_err(|e| transport_error(Call::ProfileFetch, e))?;
            let message = profile_error_message(&error_text);
            error!(status = %status, error = %message, "LinkedIn profile fetch failed");
            return Err(LinkedInError::ProfileFetchFailed(message));
        }

        response.json::<LinkedInProfile>().await.map_err(|e| {
            if e.is_timeout() {
                transport_error(Call::ProfileFetch, e)
            } else {
                LinkedInError::SerializationError(e.to_string())
            }
        })
    }
}

/// Timeouts count as a failed call; anything else is unexpected
fn transport_error(call: Call, err: reqwest::Error) -> LinkedInError {
    if err.is_timeout() {
        warn!(call = ?call, "LinkedIn request timed out");
        let message = "LinkedIn did not respond in time.".to_string();
        return match call {
            Call::TokenExchange => LinkedInError::TokenExchangeFailed(message),
            Call::ProfileFetch => LinkedInError::ProfileFetchFailed(message),
        };
    }

    // reqwest errors carry the URL but never the form body or headers
    LinkedInError::RequestFailed(err.without_url().to_string())
}

fn parse_error_body(body: &str) -> Option<LinkedInErrorBody> {
    match serde_json::from_str::<LinkedInErrorBody>(body) {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(body = %body, "LinkedIn error response was not valid JSON");
            None
        }
    }
}

fn first_present(candidates: [Option<String>; 3]) -> Option<String> {
    candidates.into_iter().flatten().find(|s| !s.is_empty())
}

/// `error_description`, then `error`, then a generic message
pub fn token_error_message(body: &str) -> String {
    parse_error_body(body)
        .and_then(|b| first_present([b.error_description, b.error, None]))
        .unwrap_or_else(|| TOKEN_EXCHANGE_FALLBACK.to_string())
}

/// `message`, then `error_description`, then `error`, then a generic message
pub fn profile_error_message(body: &str) -> String {
    parse_error_body(body)
        .and_then(|b| first_present([b.message, b.error_description, b.error]))
        .unwrap_or_else(|| PROFILE_FETCH_FALLBACK.to_string())
}

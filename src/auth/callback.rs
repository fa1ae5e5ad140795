//! LinkedIn callback state machine
//!
//! The callback walks a fixed sequence of checks:
//!
//! 0. query decodes (handled by the route before these steps)
//! 1. provider-reported error
//! 2. server configuration
//! 3. anti-forgery state (cookie present, then cookie == query)
//! 4. authorization code present
//! 5. token exchange
//! 6. profile fetch
//!
//! The first failing step decides the outcome and nothing after it runs.
//! Every outcome, success included, is a [`CallbackOutcome`] variant and maps
//! to exactly one redirect.

use tracing::{error, warn};

use super::models::{CallbackParams, LinkedInProfile};
use crate::common::helpers::{build_url, non_empty};
use crate::common::LinkedInCredentials;
use crate::services::linkedin::{LinkedInError, LinkedInService};

pub const STATUS_PARAM: &str = "linkedin_auth_status";
pub const ERROR_PARAM: &str = "linkedin_error";
pub const ERROR_DESCRIPTION_PARAM: &str = "linkedin_error_description";

/// Terminal states of a single callback invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Success,
    /// LinkedIn redirected with `error`, e.g. `user_cancelled_login`
    ProviderError {
        error: String,
        description: Option<String>,
    },
    /// Query string could not be decoded at all
    MalformedCallback,
    ConfigError,
    StateMissing,
    StateMismatch,
    CodeMissing,
    TokenExchangeFailed(String),
    AccessTokenMissing,
    ProfileFetchFailed(String),
    Unexpected,
}

impl CallbackOutcome {
    /// Machine-readable code placed in `linkedin_error`
    pub fn error_code(&self) -> Option<&str> {
        match self {
            CallbackOutcome::Success => None,
            CallbackOutcome::ProviderError { error, .. } => Some(error),
            CallbackOutcome::MalformedCallback => Some("invalid_callback_request"),
            CallbackOutcome::ConfigError => Some("server_config_error"),
            CallbackOutcome::StateMissing => Some("state_cookie_missing"),
            CallbackOutcome::StateMismatch => Some("state_mismatch"),
            CallbackOutcome::CodeMissing => Some("code_missing"),
            CallbackOutcome::TokenExchangeFailed(_) => Some("token_exchange_failed"),
            CallbackOutcome::AccessTokenMissing => Some("access_token_missing"),
            CallbackOutcome::ProfileFetchFailed(_) => Some("profile_fetch_failed"),
            CallbackOutcome::Unexpected => Some("internal_server_error"),
        }
    }

    /// Human-readable text placed in `linkedin_error_description`
    pub fn description(&self) -> Option<&str> {
        match self {
            CallbackOutcome::Success => None,
            CallbackOutcome::ProviderError { description, .. } => description.as_deref(),
            CallbackOutcome::MalformedCallback => {
                Some("The response from LinkedIn could not be read. Please try again.")
            }
            CallbackOutcome::ConfigError => Some("OAuth configuration is incomplete on the server."),
            CallbackOutcome::StateMissing => Some("Authentication state missing. Please try again."),
            CallbackOutcome::StateMismatch => {
                Some("Invalid authentication state. Please try again.")
            }
            CallbackOutcome::CodeMissing => Some("Authorization code not provided by LinkedIn."),
            CallbackOutcome::TokenExchangeFailed(message) => Some(message),
            CallbackOutcome::AccessTokenMissing => Some("No access token received from LinkedIn."),
            CallbackOutcome::ProfileFetchFailed(message) => Some(message),
            CallbackOutcome::Unexpected => {
                Some("An unexpected error occurred during login. Please try again later.")
            }
        }
    }

    /// Redirect back to `home` carrying the outcome as query parameters
    pub fn redirect_url(&self, home: &str) -> String {
        let Some(code) = self.error_code() else {
            return build_url(home, &[(STATUS_PARAM, "success")]);
        };

        let mut params = vec![(STATUS_PARAM, "error"), (ERROR_PARAM, code)];
        if let Some(description) = self.description() {
            params.push((ERROR_DESCRIPTION_PARAM, description));
        }
        build_url(home, &params)
    }
}

impl From<LinkedInError> for CallbackOutcome {
    fn from(err: LinkedInError) -> Self {
        match err {
            LinkedInError::NotConfigured => CallbackOutcome::ConfigError,
            LinkedInError::TokenExchangeFailed(message) => {
                CallbackOutcome::TokenExchangeFailed(message)
            }
            LinkedInError::AccessTokenMissing => CallbackOutcome::AccessTokenMissing,
            LinkedInError::ProfileFetchFailed(message) => {
                CallbackOutcome::ProfileFetchFailed(message)
            }
            LinkedInError::RequestFailed(_) | LinkedInError::SerializationError(_) => {
                error!(error = %err, "OAuth callback unhandled error");
                CallbackOutcome::Unexpected
            }
        }
    }
}

fn check_provider_error(params: &CallbackParams) -> Result<(), CallbackOutcome> {
    match non_empty(params.error.as_ref()) {
        Some(error) => {
            let description = non_empty(params.error_description.as_ref()).map(str::to_string);
            warn!(
                oauth_error = %error,
                description = %description.as_deref().unwrap_or("No description"),
                "LinkedIn OAuth returned explicit error"
            );
            Err(CallbackOutcome::ProviderError {
                error: error.to_string(),
                description,
            })
        }
        None => Ok(()),
    }
}

fn check_config(service: &LinkedInService) -> Result<LinkedInCredentials, CallbackOutcome> {
    service.credentials().ok_or_else(|| {
        error!("Server-side LinkedIn OAuth environment variables are not fully configured");
        CallbackOutcome::ConfigError
    })
}

/// Exact comparison; the cookie value is not normalised
fn check_state(stored: Option<&str>, received: Option<&str>) -> Result<(), CallbackOutcome> {
    let Some(stored) = stored.filter(|s| !s.is_empty()) else {
        error!("OAuth state cookie not found, possible CSRF or cookie issue");
        return Err(CallbackOutcome::StateMissing);
    };

    match received {
        Some(received) if received == stored => Ok(()),
        _ => {
            error!(
                received_present = received.is_some(),
                "Invalid OAuth state, possible CSRF"
            );
            Err(CallbackOutcome::StateMismatch)
        }
    }
}

fn check_code(params: &CallbackParams) -> Result<&str, CallbackOutcome> {
    non_empty(params.code.as_ref()).ok_or_else(|| {
        error!("Authorization code not found in callback from LinkedIn");
        CallbackOutcome::CodeMissing
    })
}

/// Runs every step in order and returns the verified profile
pub async fn authenticate(
    service: &LinkedInService,
    params: &CallbackParams,
    stored_state: Option<&str>,
) -> Result<LinkedInProfile, CallbackOutcome> {
    check_provider_error(params)?;
    let credentials = check_config(service)?;
    check_state(stored_state, non_empty(params.state.as_ref()))?;
    let code = check_code(params)?;

    let access_token = service.exchange_code(&credentials, code).await?;
    let profile = service.fetch_profile(&access_token).await?;

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::RawCallbackParams;

    fn params(
        code: Option<&str>,
        state: Option<&str>,
        error: Option<&str>,
        error_description: Option<&str>,
    ) -> CallbackParams {
        CallbackParams {
            code: code.map(str::to_string),
            state: state.map(str::to_string),
            error: error.map(str::to_string),
            error_description: error_description.map(str::to_string),
        }
    }

    #[test]
    fn test_provider_error_passes_through_verbatim() {
        let outcome = check_provider_error(&params(
            None,
            None,
            Some("user_cancelled_login"),
            Some("The user cancelled LinkedIn login"),
        ))
        .unwrap_err();

        assert_eq!(outcome.error_code(), Some("user_cancelled_login"));
        assert_eq!(
            outcome.description(),
            Some("The user cancelled LinkedIn login")
        );
    }

    #[test]
    fn test_empty_provider_error_is_ignored() {
        assert!(check_provider_error(&params(Some("c"), None, Some(""), None)).is_ok());
    }

    #[test]
    fn test_state_checks_distinguish_missing_and_mismatch() {
        assert_eq!(
            check_state(None, Some("abc")),
            Err(CallbackOutcome::StateMissing)
        );
        assert_eq!(
            check_state(Some(""), Some("abc")),
            Err(CallbackOutcome::StateMissing)
        );
        assert_eq!(
            check_state(Some("abc"), None),
            Err(CallbackOutcome::StateMismatch)
        );
        assert_eq!(
            check_state(Some("abc"), Some("ABC")),
            Err(CallbackOutcome::StateMismatch)
        );
        assert_eq!(check_state(Some("abc"), Some("abc")), Ok(()));
    }

    #[test]
    fn test_code_check_rejects_empty_code() {
        assert_eq!(
            check_code(&params(Some(""), None, None, None)),
            Err(CallbackOutcome::CodeMissing)
        );
        assert_eq!(check_code(&params(Some("abc"), None, None, None)), Ok("abc"));
    }

    #[test]
    fn test_success_redirect_carries_only_status() {
        assert_eq!(
            CallbackOutcome::Success.redirect_url("/"),
            "/?linkedin_auth_status=success"
        );
    }

    #[test]
    fn test_error_redirect_carries_code_and_description() {
        let url = CallbackOutcome::StateMismatch.redirect_url("https://lenny.example/");
        assert_eq!(
            url,
            "https://lenny.example/?linkedin_auth_status=error&linkedin_error=state_mismatch\
             &linkedin_error_description=Invalid%20authentication%20state.%20Please%20try%20again."
        );
    }

    #[test]
    fn test_provider_error_without_description_omits_parameter() {
        let outcome = CallbackOutcome::ProviderError {
            error: "access_denied".to_string(),
            description: None,
        };
        let url = outcome.redirect_url("/");
        assert_eq!(url, "/?linkedin_auth_status=error&linkedin_error=access_denied");
    }

    #[test]
    fn test_every_failure_has_distinct_code() {
        let outcomes = [
            CallbackOutcome::MalformedCallback,
            CallbackOutcome::ConfigError,
            CallbackOutcome::StateMissing,
            CallbackOutcome::StateMismatch,
            CallbackOutcome::CodeMissing,
            CallbackOutcome::TokenExchangeFailed("x".into()),
            CallbackOutcome::AccessTokenMissing,
            CallbackOutcome::ProfileFetchFailed("x".into()),
            CallbackOutcome::Unexpected,
        ];
        let mut codes: Vec<&str> = outcomes.iter().filter_map(|o| o.error_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), outcomes.len());
    }

    #[test]
    fn test_repeated_keys_keep_first_value() {
        let raw = RawCallbackParams {
            code: vec!["first-code".into(), "second-code".into()],
            state: vec!["a".into(), "b".into()],
            error: vec![],
            error_description: vec![],
        };
        let params: CallbackParams = raw.into();

        assert_eq!(params.code.as_deref(), Some("first-code"));
        assert_eq!(params.state.as_deref(), Some("a"));
        assert_eq!(params.error, None);
        assert!(check_provider_error(&params).is_ok());
        assert_eq!(check_state(Some("a"), non_empty(params.state.as_ref())), Ok(()));
    }

    #[test]
    fn test_malformed_callback_redirects_with_own_code() {
        let url = CallbackOutcome::MalformedCallback.redirect_url("/");
        assert!(url.starts_with(
            "/?linkedin_auth_status=error&linkedin_error=invalid_callback_request&"
        ));
    }

    #[test]
    fn test_transport_errors_map_to_internal_error() {
        let outcome: CallbackOutcome =
            LinkedInError::RequestFailed("connection refused".into()).into();
        assert_eq!(outcome, CallbackOutcome::Unexpected);
        assert_eq!(outcome.error_code(), Some("internal_server_error"));
    }
}

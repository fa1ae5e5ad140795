//! LinkedIn sign-in handlers

use axum::extract::Extension;
use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use axum_extra::extract::{Query, QueryRejection};
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::callback::{self, CallbackOutcome};
use super::models::{
    CallbackParams, RawCallbackParams, STATE_COOKIE, STATE_COOKIE_MAX_AGE_MINUTES,
};
use super::state_token::{generate_state, STATE_LENGTH};
use crate::common::{safe_email_log, ApiError, AppState};

/// Cookie that carries the state token between the start route and the callback
fn state_cookie(value: String, max_age: time::Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((STATE_COOKIE, value))
        .path("/")
        .max_age(max_age)
        .same_site(SameSite::Lax)
        .secure(secure)
        .http_only(true)
        .build()
}

/// GET /auth/linkedin - Start LinkedIn OAuth flow
/// Sets the anti-forgery cookie and redirects to LinkedIn's authorization page
pub async fn linkedin_oauth_start(
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), ApiError> {
    let oauth_state = generate_state(STATE_LENGTH);

    let auth_url = state
        .linkedin_service
        .authorization_url(&oauth_state)
        .map_err(|e| {
            let api_error = ApiError::ServiceUnavailable(
                "LinkedIn connection is currently unavailable. Please try again later.".to_string(),
            );
            error!(cause = %e, error = %api_error, "LinkedIn client ID or redirect URI is not configured");
            api_error
        })?;

    let cookie = state_cookie(
        oauth_state,
        time::Duration::minutes(STATE_COOKIE_MAX_AGE_MINUTES),
        state.config.cookie_secure,
    );

    info!("Redirecting to LinkedIn authorization page");
    Ok((jar.add(cookie), Redirect::to(&auth_url)))
}

/// GET /auth/callback - Handle OAuth callback from LinkedIn
///
/// Always answers with a redirect to the landing page and always clears the
/// state cookie, whatever the outcome. Repeated query keys keep their first
/// value; an undecodable query is itself a terminal outcome.
pub async fn linkedin_oauth_callback(
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
    query: Result<Query<RawCallbackParams>, QueryRejection>,
) -> (CookieJar, Redirect) {
    let request_id = Uuid::new_v4();
    let stored_state = jar.get(STATE_COOKIE).map(|c| c.value().to_string());

    let outcome = async {
        let params: CallbackParams = match query {
            Ok(Query(raw)) => raw.into(),
            Err(rejection) => {
                warn!(error = %rejection, "Malformed LinkedIn callback query");
                return CallbackOutcome::MalformedCallback;
            }
        };

        match callback::authenticate(&state.linkedin_service, &params, stored_state.as_deref())
            .await
        {
            Ok(profile) => {
                // Session issuance belongs to a downstream collaborator
                info!(
                    sub = %profile.sub,
                    email = %profile.email.as_deref().map(safe_email_log).unwrap_or_default(),
                    "LinkedIn authentication successful"
                );
                CallbackOutcome::Success
            }
            Err(outcome) => outcome,
        }
    }
    .instrument(info_span!("linkedin_callback", %request_id))
    .await;

    let removal = state_cookie(
        String::new(),
        time::Duration::ZERO,
        state.config.cookie_secure,
    );

    (
        jar.add(removal),
        Redirect::to(&outcome.redirect_url(&state.home_url())),
    )
}

/// GET /health - Liveness probe
pub async fn health(Extension(state): Extension<Arc<AppState>>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "linkedin_configured": state.linkedin_service.config().is_configured(),
    }))
}

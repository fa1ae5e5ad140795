//! Authentication routes

use axum::{routing::get, Router};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `GET /auth/linkedin` - Start LinkedIn OAuth flow
/// - `GET /auth/callback` - LinkedIn redirect target
/// - `GET /api/auth/linkedin/callback` - Same handler, legacy registered path
/// - `GET /health` - Liveness probe
pub fn auth_routes() -> Router {
    Router::new()
        .route("/auth/linkedin", get(handlers::linkedin_oauth_start))
        .route("/auth/callback", get(handlers::linkedin_oauth_callback))
        .route(
            "/api/auth/linkedin/callback",
            get(handlers::linkedin_oauth_callback),
        )
        .route("/health", get(handlers::health))
}

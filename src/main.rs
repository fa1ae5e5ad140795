// src/main.rs
use axum::{extract::Extension, middleware, Router};
use dotenv::dotenv;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod auth;
mod common;
mod logging_middleware;
mod services;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use common::{AppConfig, AppState};
use services::LinkedInService;

/// Assembles the router with every route group and layer
fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        // ====================================================================
        // AUTHENTICATION ROUTES
        // ====================================================================
        .merge(auth::auth_routes())
        // ====================================================================
        // MIDDLEWARE AND LAYERS
        // ====================================================================
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let config = AppConfig::from_env();
    info!(linkedin = ?config.linkedin, frontend_url = ?config.frontend_url, "Loaded configuration");

    if !config.linkedin.is_configured() {
        warn!("LinkedIn OAuth is not fully configured; sign-in will report server_config_error");
    }
    if !config.cookie_secure {
        warn!("COOKIE_SECURE=false: state cookie will be sent over plain HTTP");
    }

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let linkedin_service = Arc::new(LinkedInService::new(config.linkedin.clone())?);
    info!(
        timeout_secs = config.linkedin.http_timeout.as_secs(),
        "LinkedInService initialized"
    );

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let port = config.port;
    let app_state = Arc::new(AppState {
        config,
        linkedin_service,
    });

    let app = build_app(app_state);

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

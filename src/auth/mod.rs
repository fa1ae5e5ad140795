//! # Auth Module
//!
//! LinkedIn sign-in:
//! - Authorization start (state token + anti-forgery cookie)
//! - Callback state machine (state check, code exchange, profile fetch)
//! - Redirect back to the landing page with a machine-readable status

pub mod callback;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state_token;


pub use routes::auth_routes;

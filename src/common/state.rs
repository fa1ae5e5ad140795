// Application state shared across all modules

use std::sync::Arc;

use crate::common::config::AppConfig;
use crate::services::LinkedInService;

/// Application state containing configuration and the outbound LinkedIn client
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub linkedin_service: Arc<LinkedInService>,
}

impl AppState {
    /// Redirect target for every callback outcome
    pub fn home_url(&self) -> String {
        match &self.config.frontend_url {
            Some(base) => format!("{}/", base),
            None => "/".to_string(),
        }
    }
}

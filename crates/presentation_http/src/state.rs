//! Application state shared across handlers

use std::sync::Arc;

use application::ModerationService;
use infrastructure::AppConfig;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Moderation pipeline
    pub moderation: Arc<ModerationService>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

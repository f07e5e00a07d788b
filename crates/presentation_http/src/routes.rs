//! Route definitions

use axum::{
    Router,
    routing::{get, post},
};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoint
        .route("/health", get(handlers::health::health_check))
        // Spark webhook; the root path is where deliveries historically land
        .route("/", post(handlers::webhook::handle_webhook))
        .route("/webhook/spark", post(handlers::webhook::handle_webhook))
        // Attach state
        .with_state(state)
}

//! Route definitions

use axum::{Router, routing::get};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Liveness
        .route("/health", get(handlers::health::health_check))
        // Prometheus scrape endpoint
        .route("/metrics", get(handlers::metrics::get_metrics))
        // Attach state
        .with_state(state)
}

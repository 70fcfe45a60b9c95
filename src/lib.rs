pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod state;
pub mod upstream;

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::handlers::{currency_handler, health_handler, metrics_handler};
use crate::state::AppState;

// Router with all gateway routes
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/currency", get(currency_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

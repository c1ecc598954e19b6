pub mod charts;
pub mod data;
pub mod subscriptions;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // Chart series
        .route("/api/charts", get(charts::index))
        .route("/api/charts/:view", get(charts::show))
        // Subscription table
        .route("/api/subscriptions", get(subscriptions::index))
        .route("/api/subscriptions/export.csv", get(subscriptions::export))
        .route("/api/vendors", get(subscriptions::vendors))
        // Data source
        .route("/api/reload", post(data::reload))
        // Health check
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}

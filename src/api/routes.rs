use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::api::handlers::{self, AppState};
use crate::upstream::UpstreamFetcher;

pub fn create_router<F: UpstreamFetcher + 'static>() -> Router<AppState<F>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Document with linked images and gifts
        .route("/fetch-azure-file", post(handlers::fetch_document::<F>))
        // Navigation activity ids
        .route("/fetch-activity-ids", post(handlers::fetch_activity_ids::<F>))
        // Browser clients call from another origin
        .layer(CorsLayer::permissive())
}

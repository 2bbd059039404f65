//! HTTP handlers for the recipe API.

pub mod recipes;
pub mod status;

use std::sync::Arc;

use axum::Router;

use crate::cors::cors_layer;

pub use recipes::{error_response, parse_recipe_handler, recipes_router, MessageResponse};
pub use status::{
    health_handler, status_handler, status_router, AppState, ExtractionMetrics, HealthResponse,
    LatencyRecorder, LatencySummary, ProcessMemory, StatusResponse,
};

/// The full application router: recipe routes, status routes and CORS.
pub fn app_router(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    Router::new()
        .merge(recipes_router())
        .merge(status_router())
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

//! Route definitions for the dashboard server

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Creates the main application router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Dashboard page
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        // Selection options
        .route("/api/neighborhoods", get(handlers::list_neighborhoods))
        // Figures for a selection
        .route("/api/figures", post(handlers::all_figures))
        .route("/api/figures/:chart", post(handlers::chart_figure))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

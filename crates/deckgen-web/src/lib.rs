use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod handlers;
pub mod models;
pub mod state;
pub mod upload;

pub use config::ServerConfig;
pub use state::AppState;

/// Build the application router.
///
/// The request body limit sits just above the configured file limit so that
/// slightly oversized files still reach the handler and get a JSON 413.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.body_limit());
    let cors = if state.config.cors_allow_any_origin {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route(
            "/api/extract-pdf-text",
            post(handlers::extract::extract_pdf_text),
        )
        .route("/health", get(handlers::health::health))
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

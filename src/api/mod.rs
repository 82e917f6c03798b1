use axum::{Router, routing::post};
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::keyword_engine::KeywordEngine;

pub mod handlers;
pub mod models;

pub fn create_router(engine: Arc<KeywordEngine>, static_dir: &Path) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // API routes
        .route("/api/analyze", post(handlers::analyze_handler))
        .with_state(engine)
        // Everything else is the UI
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
}

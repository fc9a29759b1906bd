//! Thesa API - HTTP server
//!
//! Serves annotation against a vocabulary held in memory. The vocabulary is
//! loaded at startup and may be replaced at runtime; annotation results can
//! be saved together with their curated version.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use thesa_core::config::ServerConfig;

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let server = &state.config.server;
    let body_limit = DefaultBodyLimit::max(server.max_body_size);
    let cors = server.cors_enabled.then(|| cors_layer(server));

    let router = Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http());

    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.with_state(state)
}

/// Router over an empty vocabulary with default configuration
pub fn create_router_for_testing() -> Router {
    create_router(Arc::new(AppState::default()))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if server.cors_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

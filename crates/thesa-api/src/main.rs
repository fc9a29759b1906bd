//! Thesa API Server
//!
//! HTTP server for thesaurus-driven text annotation.
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use thesa_api::{create_router, state::AppState};
use thesa_core::config::AppConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = match std::env::var("THESA_CONFIG") {
        Ok(path) => AppConfig::from_file(path)?.with_env_override()?,
        Err(_) => AppConfig::from_env()?,
    };

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "thesa_api={level},thesa_annotator={level},tower_http={level}",
            level = config.logging.level
        ))
    });
    if config.logging.json_format {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    if config.server.api_token.is_none() {
        tracing::info!("THESA_API_TOKEN not set, vocabulary replacement and saved annotations disabled");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let vocabulary_path = config.vocabulary.path.clone();

    // Create application state
    let state = Arc::new(AppState::new(config));
    match vocabulary_path {
        Some(path) => state.load_vocabulary_file(&path).await?,
        None => tracing::warn!("No vocabulary configured, starting empty"),
    }

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Thesa API Server starting on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

//! Health check handlers
//!
//! Author: hephaex@gmail.com

use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub vocabulary_loaded: bool,
}

/// Liveness check
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let annotator = state.annotator().await;

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        vocabulary_loaded: !annotator.vocabulary().is_empty(),
    })
}

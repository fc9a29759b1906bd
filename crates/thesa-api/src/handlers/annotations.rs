//! Saved annotation handlers
//!
//! Author: hephaex@gmail.com

use crate::error::AppError;
use crate::state::AppState;
use crate::store::{AnnotationRecord, NewAnnotation};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

/// Saved annotation list response
#[derive(Debug, Serialize)]
pub struct AnnotationListResponse {
    pub annotations: Vec<AnnotationRecord>,
    pub total: usize,
}

/// Save an annotation result and its curated version
pub async fn save_annotation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewAnnotation>,
) -> Result<impl IntoResponse, AppError> {
    if req.original_text.trim().is_empty() {
        return Err(AppError::BadRequest("Original text cannot be empty".to_string()));
    }

    let record = state.annotations.insert(req).await;
    tracing::info!(id = %record.id, "Annotation saved");

    Ok((StatusCode::CREATED, Json(record)))
}

/// List saved annotations, oldest first
pub async fn list_annotations(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let annotations = state.annotations.list().await;

    Json(AnnotationListResponse {
        total: annotations.len(),
        annotations,
    })
}

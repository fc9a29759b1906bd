//! Annotation and stemming handlers
//!
//! Author: hephaex@gmail.com

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thesa_annotator::{stem, CancellationFlag, TextAnnotator};
use thesa_core::AnnotateOptions;

/// Annotate request body
#[derive(Debug, Deserialize)]
pub struct AnnotateRequest {
    /// Text to annotate
    pub text: String,

    /// Compare stems; falls back to the server default when absent
    #[serde(default)]
    pub use_stem: Option<bool>,
}

/// Annotate a text against the served vocabulary
///
/// Matching runs on the blocking pool. When it exceeds the request timeout
/// the work is cancelled at the next sentence boundary.
pub async fn annotate_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnnotateRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::BadRequest("Text cannot be empty".to_string()));
    }
    let max = state.config.annotation.max_text_length;
    if req.text.len() > max {
        return Err(AppError::BadRequest(format!(
            "Text exceeds maximum length of {max} bytes"
        )));
    }

    let annotator = state.annotator().await;
    let options = AnnotateOptions {
        use_stem: req.use_stem.unwrap_or(annotator.options().use_stem),
    };

    let cancel = CancellationFlag::new();
    let worker_cancel = cancel.clone();
    let task = tokio::task::spawn_blocking(move || {
        annotator.annotate_with_cancel(&req.text, &options, &worker_cancel)
    });

    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);
    let result = match tokio::time::timeout(timeout, task).await {
        Ok(joined) => joined.map_err(|e| AppError::Internal(e.to_string()))??,
        Err(_) => {
            cancel.cancel();
            tracing::warn!("Annotation cancelled after {}s", timeout.as_secs());
            return Err(AppError::Timeout);
        }
    };

    tracing::debug!(
        sentences = result.sentences.len(),
        concepts = result.concepts.len(),
        "Annotation finished"
    );
    Ok(Json(result))
}

/// Stem request body
#[derive(Debug, Deserialize)]
pub struct StemRequest {
    pub words: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StemEntry {
    pub word: String,
    pub stem: String,
}

#[derive(Debug, Serialize)]
pub struct StemResponse {
    pub stems: Vec<StemEntry>,
}

/// Stem each word independently
pub async fn stem_handler(Json(req): Json<StemRequest>) -> Result<impl IntoResponse, AppError> {
    if req.words.is_empty() {
        return Err(AppError::BadRequest("No words given".to_string()));
    }

    let stems = req
        .words
        .into_iter()
        .map(|word| StemEntry {
            stem: stem(&word),
            word,
        })
        .collect();

    Ok(Json(StemResponse { stems }))
}

//! Vocabulary handlers
//!
//! Author: hephaex@gmail.com

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thesa_annotator::{Vocabulary, VocabularyDiagnostic, VocabularyStats};
use thesa_parser::VocabularyFormat;

/// Served vocabulary summary
#[derive(Debug, Serialize)]
pub struct VocabularyResponse {
    /// Language alternate labels are filtered to
    pub language: String,
    #[serde(flatten)]
    pub stats: VocabularyStats,
    /// Entries skipped by the last load
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<VocabularyDiagnostic>,
}

impl VocabularyResponse {
    fn new(language: &str, vocabulary: &Vocabulary, with_diagnostics: bool) -> Self {
        Self {
            language: language.to_string(),
            stats: vocabulary.stats(),
            skipped: if with_diagnostics {
                vocabulary.diagnostics().to_vec()
            } else {
                Vec::new()
            },
        }
    }
}

/// Current vocabulary statistics
pub async fn get_vocabulary(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let annotator = state.annotator().await;
    Json(VocabularyResponse::new(
        &state.config.vocabulary.language,
        annotator.vocabulary(),
        false,
    ))
}

/// Vocabulary upload body
#[derive(Debug, Deserialize)]
pub struct ReplaceVocabularyRequest {
    /// `turtle`, `ntriples` or `json`
    pub format: String,
    /// Serialized triples
    pub content: String,
}

/// Replace the served vocabulary
///
/// Parsing and index building run on the blocking pool. Requests already
/// running keep the vocabulary they started with.
pub async fn replace_vocabulary(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReplaceVocabularyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let format: VocabularyFormat = req.format.parse()?;

    let worker = state.clone();
    let (vocabulary, triple_count) = tokio::task::spawn_blocking(move || {
        let triples = worker.parsers.parse_str(format, &req.content)?;
        let vocabulary = Vocabulary::from_triples(&triples, &worker.vocabulary_options());
        Ok::<_, AppError>((vocabulary, triples.len()))
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let response = VocabularyResponse::new(&state.config.vocabulary.language, &vocabulary, true);

    tracing::info!(
        "Vocabulary replaced: {} concepts from {} triples",
        response.stats.concepts,
        triple_count
    );
    state.replace_vocabulary(vocabulary).await;

    Ok(Json(response))
}

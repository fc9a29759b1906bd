//! Saved annotations
//!
//! Keeps annotation results together with the text they were made for and
//! any corrections a curator made to them. Records live in memory for the
//! lifetime of the server.
//!
//! Author: hephaex@gmail.com

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thesa_core::AnnotationResult;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A saved annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub id: Uuid,
    /// Text the annotation was made for
    pub original_text: String,
    /// Result as produced by the annotator
    pub model_annotations: AnnotationResult,
    /// Curator's version, free-form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curated_annotations: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Annotation to be saved
#[derive(Debug, Clone, Deserialize)]
pub struct NewAnnotation {
    pub original_text: String,
    pub model_annotations: AnnotationResult,
    #[serde(default)]
    pub curated_annotations: Option<serde_json::Value>,
}

/// In-memory annotation store, in save order
#[derive(Debug, Default)]
pub struct AnnotationStore {
    records: RwLock<Vec<AnnotationRecord>>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save an annotation, assigning its id and timestamp
    pub async fn insert(&self, annotation: NewAnnotation) -> AnnotationRecord {
        let record = AnnotationRecord {
            id: Uuid::new_v4(),
            original_text: annotation.original_text,
            model_annotations: annotation.model_annotations,
            // `null` carries no curation
            curated_annotations: annotation.curated_annotations.filter(|v| !v.is_null()),
            created_at: Utc::now(),
        };

        self.records.write().await.push(record.clone());
        record
    }

    /// All saved annotations, oldest first
    pub async fn list(&self) -> Vec<AnnotationRecord> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

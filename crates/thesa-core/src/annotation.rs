//! Annotation result types
//!
//! Offsets are UTF-8 byte offsets. Match spans are half-open `[start, end)`
//! and local to the sentence they were found in.

use serde::{Deserialize, Serialize};

use crate::Concept;

/// Options for a single annotation call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotateOptions {
    /// Compare word stems instead of surface forms, and consult the stemmed label map
    #[serde(default)]
    pub use_stem: bool,
}

impl AnnotateOptions {
    pub fn stemmed() -> Self {
        Self { use_stem: true }
    }
}

/// Raw label occurrence inside a sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    /// Label key that produced the match
    pub label: String,
    /// Candidate concept URIs for the label
    pub uris: Vec<String>,
}

impl Match {
    pub fn new(start: usize, end: usize, label: impl Into<String>, uris: &[String]) -> Self {
        Self {
            start,
            end,
            label: label.into(),
            uris: uris.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Contiguous slice of a sentence, highlighted or plain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uris: Option<Vec<String>>,
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlighted: false,
            label: None,
            uris: None,
        }
    }

    pub fn highlighted(
        text: impl Into<String>,
        label: impl Into<String>,
        uris: Vec<String>,
    ) -> Self {
        Self {
            text: text.into(),
            highlighted: true,
            label: Some(label.into()),
            uris: Some(uris),
        }
    }
}

/// One sentence of the input and its segmentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedSentence {
    pub text: String,
    /// Byte offset of the sentence in the annotated text
    pub offset: usize,
    pub segments: Vec<Segment>,
}

impl AnnotatedSentence {
    /// Highlighted segments only
    pub fn highlights(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.highlighted)
    }
}

/// Output of an annotation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationResult {
    pub sentences: Vec<AnnotatedSentence>,
    /// Matched concepts, deduplicated by URI in first-seen order
    pub concepts: Vec<Concept>,
}

impl AnnotationResult {
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty() && self.concepts.is_empty()
    }

    /// Total number of highlighted segments across all sentences
    pub fn highlight_count(&self) -> usize {
        self.sentences.iter().map(|s| s.highlights().count()).sum()
    }
}

//! Thesa Core - Domain models, errors, and shared types
//!
//! This crate defines the core abstractions used throughout Thesa:
//! - RDF triple model consumed at the vocabulary ingestion boundary
//! - SKOS concept model and the label lookup structures
//! - Annotation results (matches, segments, annotated sentences)
//! - Common error types
//! - Configuration management

pub mod annotation;
pub mod config;
pub mod maps;

pub use annotation::{AnnotateOptions, AnnotatedSentence, AnnotationResult, Match, Segment};
pub use config::{
    AnnotationConfig, AppConfig, ConfigError, LoggingConfig, ServerConfig, VocabularyConfig,
};
pub use maps::{normalize_label, ConceptMap, LabelIndex, LabelMap, StemmedLabelMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for Thesa operations
#[derive(Error, Debug)]
pub enum ThesaError {
    #[error("Annotation cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ThesaError>;

// ============================================================================
// Namespaces
// ============================================================================

/// IRIs of the RDF/SKOS terms the vocabulary loader understands
pub mod ns {
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";

    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const SKOS_CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";
    pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
    pub const SKOS_ALT_LABEL: &str = "http://www.w3.org/2004/02/skos/core#altLabel";
    pub const SKOS_DEFINITION: &str = "http://www.w3.org/2004/02/skos/core#definition";
}

// ============================================================================
// Triple Model
// ============================================================================

/// Object position of a triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Term {
    Iri {
        value: String,
    },
    BlankNode {
        value: String,
    },
    Literal {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        datatype: Option<String>,
    },
}

impl Term {
    /// Create an IRI term
    pub fn iri(value: impl Into<String>) -> Self {
        Self::Iri {
            value: value.into(),
        }
    }

    /// Create a plain literal without language tag
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    /// Create a language-tagged literal
    pub fn lang_literal(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            language: Some(language.into()),
            datatype: None,
        }
    }

    /// Lexical value of the term
    pub fn value(&self) -> &str {
        match self {
            Self::Iri { value } | Self::BlankNode { value } | Self::Literal { value, .. } => value,
        }
    }

    /// Language tag, for literals that carry one
    pub fn language(&self) -> Option<&str> {
        match self {
            Self::Literal { language, .. } => language.as_deref(),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal { .. })
    }
}

/// A single RDF statement as handed over by a triple reader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    /// Subject IRI or blank node label
    pub subject: String,

    /// Predicate IRI
    pub predicate: String,

    /// Object term
    pub object: Term,
}

impl Triple {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }

    /// Check whether this triple is `<subject> rdf:type skos:Concept`
    pub fn is_concept_typing(&self) -> bool {
        self.predicate == ns::RDF_TYPE && self.object.value() == ns::SKOS_CONCEPT
    }
}

// ============================================================================
// Concept Model
// ============================================================================

/// A thesaurus concept
///
/// Immutable once loaded. Match results reference concepts by URI; the
/// concept value is only copied into the concept list returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    /// Concept URI assigned by the source vocabulary
    pub uri: String,

    /// Preferred label (required)
    pub pref_label: String,

    /// Alternate labels in the target language, in source order
    #[serde(default)]
    pub alt_labels: Vec<String>,

    /// Optional definition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

impl Concept {
    pub fn new(uri: impl Into<String>, pref_label: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            pref_label: pref_label.into(),
            alt_labels: Vec::new(),
            definition: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

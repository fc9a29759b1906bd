//! SKOS vocabulary loader
//!
//! Turns a triple snapshot into the concept map and label map, skipping
//! entries that cannot be used for annotation. Problems never abort a
//! load; they are logged and collected as [`VocabularyDiagnostic`]s.

use std::collections::{HashMap, HashSet};

use once_cell::sync::OnceCell;
use serde::Serialize;
use thesa_core::{ns, Concept, ConceptMap, LabelMap, StemmedLabelMap, Term, Triple};

use crate::matcher::LabelPatterns;
use crate::stem_index::build_stemmed_label_map_with;

// ============================================================================
// Options and diagnostics
// ============================================================================

/// Vocabulary load options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyOptions {
    /// Alternate labels are kept only in this language
    pub language: String,
    /// Leave labels out of the stem index when stemming does not shorten them
    pub skip_unchanged_stems: bool,
}

impl Default for VocabularyOptions {
    fn default() -> Self {
        Self {
            language: "de".to_string(),
            skip_unchanged_stems: false,
        }
    }
}

impl VocabularyOptions {
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_skip_unchanged_stems(mut self, skip: bool) -> Self {
        self.skip_unchanged_stems = skip;
        self
    }
}

/// Why a vocabulary entry was (partially) skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Concept has no skos:prefLabel; the concept is skipped
    MissingPrefLabel,
    /// Preferred label is a bracketed placeholder such as `[Technik]`; the concept is skipped
    StructuralLabel,
    /// Label is empty once qualifiers are removed; the label is skipped
    EmptyLabel,
}

/// A single skipped vocabulary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VocabularyDiagnostic {
    pub uri: String,
    pub kind: DiagnosticKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl std::fmt::Display for VocabularyDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self.kind {
            DiagnosticKind::MissingPrefLabel => "no prefLabel found",
            DiagnosticKind::StructuralLabel => "structural concept omitted",
            DiagnosticKind::EmptyLabel => "label empty after normalization",
        };
        match &self.label {
            Some(label) => write!(f, "{}: {} ({:?})", self.uri, reason, label),
            None => write!(f, "{}: {}", self.uri, reason),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Concept and label maps built from one triple snapshot
#[derive(Debug, Clone, Default)]
pub struct VocabularyLoad {
    pub concepts: ConceptMap,
    pub labels: LabelMap,
    pub diagnostics: Vec<VocabularyDiagnostic>,
}

#[derive(Default)]
struct SubjectStatements<'a> {
    pref_labels: Vec<&'a Term>,
    alt_labels: Vec<&'a Term>,
    definitions: Vec<&'a Term>,
}

/// Build the concept map and label map from SKOS triples
///
/// Concepts are visited in the order of their first `rdf:type skos:Concept`
/// statement. The first preferred label and the first definition win;
/// alternate labels are kept when they are literals tagged with `language`.
pub fn load_vocabulary(triples: &[Triple], language: &str) -> VocabularyLoad {
    let mut subjects: Vec<&str> = Vec::new();
    let mut typed: HashSet<&str> = HashSet::new();
    let mut statements: HashMap<&str, SubjectStatements<'_>> = HashMap::new();

    for triple in triples {
        let subject = triple.subject.as_str();
        if triple.is_concept_typing() {
            if typed.insert(subject) {
                subjects.push(subject);
            }
            continue;
        }

        match triple.predicate.as_str() {
            ns::SKOS_PREF_LABEL => statements
                .entry(subject)
                .or_default()
                .pref_labels
                .push(&triple.object),
            ns::SKOS_ALT_LABEL => statements
                .entry(subject)
                .or_default()
                .alt_labels
                .push(&triple.object),
            ns::SKOS_DEFINITION => statements
                .entry(subject)
                .or_default()
                .definitions
                .push(&triple.object),
            _ => {}
        }
    }

    let empty = SubjectStatements::default();
    let mut load = VocabularyLoad::default();

    for uri in subjects {
        let found = statements.get(uri).unwrap_or(&empty);

        let Some(pref_label) = found.pref_labels.first().map(|t| t.value()) else {
            tracing::warn!("No prefLabel found for concept {}", uri);
            load.diagnostics.push(VocabularyDiagnostic {
                uri: uri.to_string(),
                kind: DiagnosticKind::MissingPrefLabel,
                label: None,
            });
            continue;
        };

        if is_structural(pref_label) {
            tracing::debug!("Structural concept omitted {} {}", uri, pref_label);
            load.diagnostics.push(VocabularyDiagnostic {
                uri: uri.to_string(),
                kind: DiagnosticKind::StructuralLabel,
                label: Some(pref_label.to_string()),
            });
            continue;
        }

        let alt_labels: Vec<&str> = found
            .alt_labels
            .iter()
            .filter(|t| {
                t.is_literal()
                    && t
                        .language()
                        .is_some_and(|lang| lang.eq_ignore_ascii_case(language))
            })
            .map(|t| t.value())
            .collect();

        let labels: Vec<&str> = std::iter::once(pref_label)
            .chain(alt_labels.iter().copied())
            .collect();
        let usable: Vec<&str> = labels
            .iter()
            .copied()
            .filter(|label| !thesa_core::normalize_label(label).is_empty())
            .collect();

        for label in labels.iter().filter(|l| !usable.contains(l)) {
            tracing::debug!("Empty label skipped for {} {:?}", uri, label);
            load.diagnostics.push(VocabularyDiagnostic {
                uri: uri.to_string(),
                kind: DiagnosticKind::EmptyLabel,
                label: Some(label.to_string()),
            });
        }

        // A concept no label can reach would be an orphan
        if usable.is_empty() {
            continue;
        }

        for label in &usable {
            load.labels.insert(label, uri);
        }

        let mut concept = Concept::new(uri, pref_label);
        concept.alt_labels = alt_labels.iter().map(|l| l.to_string()).collect();
        concept.definition = found.definitions.first().map(|t| t.value().to_string());
        load.concepts.insert(concept);
    }

    load
}

fn is_structural(label: &str) -> bool {
    let label = label.trim();
    label.starts_with('[') && label.ends_with(']')
}

// ============================================================================
// Vocabulary
// ============================================================================

/// Summary counts of a loaded vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VocabularyStats {
    pub concepts: usize,
    pub labels: usize,
    pub stems: usize,
    pub diagnostics: usize,
}

/// Immutable vocabulary snapshot: concepts, labels, and the derived stem index
///
/// Label patterns for matching are prepared on first use and then reused by
/// every annotation against this snapshot.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    concepts: ConceptMap,
    labels: LabelMap,
    stemmed: StemmedLabelMap,
    diagnostics: Vec<VocabularyDiagnostic>,
    label_patterns: OnceCell<LabelPatterns>,
    stemmed_label_patterns: OnceCell<LabelPatterns>,
    stem_patterns: OnceCell<LabelPatterns>,
}

impl Vocabulary {
    /// Build a vocabulary from existing maps, deriving the stem index
    pub fn new(concepts: ConceptMap, labels: LabelMap, options: &VocabularyOptions) -> Self {
        let stemmed = build_stemmed_label_map_with(&labels, options.skip_unchanged_stems);
        Self {
            concepts,
            labels,
            stemmed,
            ..Self::default()
        }
    }

    /// Load a vocabulary from SKOS triples
    pub fn from_triples(triples: &[Triple], options: &VocabularyOptions) -> Self {
        let load = load_vocabulary(triples, &options.language);
        let mut vocabulary = Self::new(load.concepts, load.labels, options);
        vocabulary.diagnostics = load.diagnostics;

        tracing::info!(
            "Vocabulary loaded: {} concepts, {} labels, {} stems, {} skipped entries",
            vocabulary.concepts.len(),
            vocabulary.labels.len(),
            vocabulary.stemmed.len(),
            vocabulary.diagnostics.len()
        );
        vocabulary
    }

    pub fn concepts(&self) -> &ConceptMap {
        &self.concepts
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    pub fn stemmed(&self) -> &StemmedLabelMap {
        &self.stemmed
    }

    /// Patterns for the label map, compared by stem when `use_stem` is set
    pub fn label_patterns(&self, use_stem: bool) -> &LabelPatterns {
        let cell = if use_stem {
            &self.stemmed_label_patterns
        } else {
            &self.label_patterns
        };
        cell.get_or_init(|| LabelPatterns::new(self.labels.as_index(), use_stem))
    }

    /// Patterns for the stem index
    pub fn stem_patterns(&self) -> &LabelPatterns {
        self.stem_patterns
            .get_or_init(|| LabelPatterns::new(self.stemmed.as_index(), true))
    }

    pub fn diagnostics(&self) -> &[VocabularyDiagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn stats(&self) -> VocabularyStats {
        VocabularyStats {
            concepts: self.concepts.len(),
            labels: self.labels.len(),
            stems: self.stemmed.len(),
            diagnostics: self.diagnostics.len(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

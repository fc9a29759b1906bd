//! Thesa Annotator - thesaurus-driven text annotation
//!
//! Finds the labels of a SKOS vocabulary in German text and returns the
//! text as highlighted segments together with the matched concepts.
//!
//! Pipeline per text:
//! 1. [`tokenizer`] splits sentences (and words, for token matching)
//! 2. [`matcher`] finds raw label occurrences, literal and stemmed
//! 3. [`reconcile`] resolves overlaps into contiguous segments
//! 4. [`annotate`] collects the concepts of the kept highlights
//!
//! # Example
//!
//! ```
//! use thesa_annotator::{Annotator, Vocabulary, VocabularyOptions};
//! use thesa_core::{ns, Term, Triple};
//!
//! let triples = vec![
//!     Triple::new("urn:c1", ns::RDF_TYPE, Term::iri(ns::SKOS_CONCEPT)),
//!     Triple::new("urn:c1", ns::SKOS_PREF_LABEL, Term::lang_literal("Email", "de")),
//! ];
//! let vocabulary = Vocabulary::from_triples(&triples, &VocabularyOptions::default());
//! let result = Annotator::new(vocabulary).run("Die Zellen werden mit Email gefüllt.");
//!
//! assert_eq!(result.concepts[0].uri, "urn:c1");
//! ```

pub mod annotate;
pub mod matcher;
pub mod reconcile;
pub mod stem_index;
pub mod stemmer;
pub mod tokenizer;
pub mod vocabulary;

pub use annotate::{annotate, annotate_with_cancel, Annotator, CancellationFlag, TextAnnotator};
pub use matcher::{find_matches, is_case_sensitive, LabelPatterns};
pub use reconcile::reconcile;
pub use stem_index::{build_stemmed_label_map, build_stemmed_label_map_with};
pub use stemmer::stem;
pub use tokenizer::{tokenize_sentences, tokenize_words, Sentence, Token};
pub use vocabulary::{
    load_vocabulary, DiagnosticKind, Vocabulary, VocabularyDiagnostic, VocabularyLoad,
    VocabularyOptions, VocabularyStats,
};

//! Annotation orchestrator
//!
//! Sentence split, label matching and span reconciliation over a whole text,
//! plus the deduplicated list of concepts that ended up highlighted.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thesa_core::{
    AnnotateOptions, AnnotatedSentence, AnnotationResult, Concept, ConceptMap, LabelMap,
    Result, StemmedLabelMap, ThesaError,
};
use tracing::debug;

use crate::matcher::LabelPatterns;
use crate::reconcile::reconcile;
use crate::tokenizer::{tokenize_sentences, Sentence};
use crate::vocabulary::Vocabulary;

/// Cooperative cancellation signal, checked between sentences
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Annotate a text against a vocabulary
///
/// Literal label matches are collected before stem matches, so on equal
/// start offsets a literal label wins.
pub fn annotate(
    text: &str,
    labels: &LabelMap,
    stemmed: &StemmedLabelMap,
    concepts: &ConceptMap,
    options: &AnnotateOptions,
) -> AnnotationResult {
    let (literal, stems) = prepare(labels, stemmed, options);
    SentenceAnnotator::new(&literal, stems.as_ref(), concepts).run(text)
}

/// Like [`annotate`], stopping with [`ThesaError::Cancelled`] once `cancel` is set
pub fn annotate_with_cancel(
    text: &str,
    labels: &LabelMap,
    stemmed: &StemmedLabelMap,
    concepts: &ConceptMap,
    options: &AnnotateOptions,
    cancel: &CancellationFlag,
) -> Result<AnnotationResult> {
    let (literal, stems) = prepare(labels, stemmed, options);
    SentenceAnnotator::new(&literal, stems.as_ref(), concepts).run_with_cancel(text, cancel)
}

fn prepare(
    labels: &LabelMap,
    stemmed: &StemmedLabelMap,
    options: &AnnotateOptions,
) -> (LabelPatterns, Option<LabelPatterns>) {
    let literal = LabelPatterns::new(labels.as_index(), options.use_stem);
    let stems = options
        .use_stem
        .then(|| LabelPatterns::new(stemmed.as_index(), true));
    (literal, stems)
}

/// Accumulates annotated sentences and the concepts they reference
struct SentenceAnnotator<'a> {
    literal: &'a LabelPatterns,
    stems: Option<&'a LabelPatterns>,
    concepts: &'a ConceptMap,
    seen: HashSet<String>,
    result: AnnotationResult,
}

impl<'a> SentenceAnnotator<'a> {
    fn new(
        literal: &'a LabelPatterns,
        stems: Option<&'a LabelPatterns>,
        concepts: &'a ConceptMap,
    ) -> Self {
        Self {
            literal,
            stems,
            concepts,
            seen: HashSet::new(),
            result: AnnotationResult::default(),
        }
    }

    fn run(mut self, text: &str) -> AnnotationResult {
        for sentence in tokenize_sentences(text) {
            self.push(sentence);
        }
        self.result
    }

    fn run_with_cancel(
        mut self,
        text: &str,
        cancel: &CancellationFlag,
    ) -> Result<AnnotationResult> {
        for sentence in tokenize_sentences(text) {
            if cancel.is_cancelled() {
                return Err(ThesaError::Cancelled);
            }
            self.push(sentence);
        }
        Ok(self.result)
    }

    fn push(&mut self, sentence: Sentence<'_>) {
        let mut matches = self.literal.find(sentence.text);
        if let Some(stems) = self.stems {
            matches.extend(stems.find(sentence.text));
        }

        let segments = reconcile(sentence.text, matches);
        let annotated = AnnotatedSentence {
            text: sentence.text.to_string(),
            offset: sentence.start,
            segments,
        };

        for uri in annotated.highlights().flat_map(|s| s.uris.iter().flatten()) {
            if !self.seen.insert(uri.clone()) {
                continue;
            }
            match self.concepts.get(uri) {
                Some(concept) => self.result.concepts.push(concept.clone()),
                None => debug!(uri = %uri, "Matched URI has no concept, skipping"),
            }
        }

        self.result.sentences.push(annotated);
    }
}

// ============================================================================
// Annotator context
// ============================================================================

/// Anything that can annotate text
pub trait TextAnnotator: Send + Sync {
    fn annotate(&self, text: &str, options: &AnnotateOptions) -> AnnotationResult;

    fn annotate_with_cancel(
        &self,
        text: &str,
        options: &AnnotateOptions,
        cancel: &CancellationFlag,
    ) -> Result<AnnotationResult>;
}

/// A loaded vocabulary together with default options
///
/// Cheap to clone; clones share the vocabulary.
#[derive(Debug, Clone)]
pub struct Annotator {
    vocabulary: Arc<Vocabulary>,
    options: AnnotateOptions,
}

impl Annotator {
    pub fn new(vocabulary: impl Into<Arc<Vocabulary>>) -> Self {
        Self {
            vocabulary: vocabulary.into(),
            options: AnnotateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AnnotateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocabulary
    }

    pub fn options(&self) -> &AnnotateOptions {
        &self.options
    }

    /// Annotate with the default options
    pub fn run(&self, text: &str) -> AnnotationResult {
        TextAnnotator::annotate(self, text, &self.options)
    }

    /// Concepts referenced by a text, without the segmentation
    pub fn concepts_in(&self, text: &str) -> Vec<Concept> {
        self.run(text).concepts
    }

    fn sentence_annotator(&self, options: &AnnotateOptions) -> SentenceAnnotator<'_> {
        let vocabulary = self.vocabulary.as_ref();
        SentenceAnnotator::new(
            vocabulary.label_patterns(options.use_stem),
            options.use_stem.then(|| vocabulary.stem_patterns()),
            vocabulary.concepts(),
        )
    }
}

impl TextAnnotator for Annotator {
    fn annotate(&self, text: &str, options: &AnnotateOptions) -> AnnotationResult {
        self.sentence_annotator(options).run(text)
    }

    fn annotate_with_cancel(
        &self,
        text: &str,
        options: &AnnotateOptions,
        cancel: &CancellationFlag,
    ) -> Result<AnnotationResult> {
        self.sentence_annotator(options).run_with_cancel(text, cancel)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stem_index::build_stemmed_label_map;
    use crate::vocabulary::VocabularyOptions;
    use proptest::prelude::*;
    use thesa_core::{ns, Term, Triple};

    fn single_concept(label: &str, uri: &str) -> (LabelMap, ConceptMap) {
        let labels: LabelMap = [(label, uri)].into_iter().collect();
        let concepts: ConceptMap = [Concept::new(uri, label)].into_iter().collect();
        (labels, concepts)
    }

    fn skos_triples() -> Vec<Triple> {
        let concept = |uri: &str, label: &str| {
            vec![
                Triple::new(uri, ns::RDF_TYPE, Term::iri(ns::SKOS_CONCEPT)),
                Triple::new(uri, ns::SKOS_PREF_LABEL, Term::lang_literal(label, "de")),
            ]
        };
        let mut triples = Vec::new();
        triples.extend(concept("urn:technik", "[Technik]"));
        triples.extend(concept("urn:email", "Email"));
        triples.extend(concept("urn:blattgold", "Blattgold"));
        triples.push(Triple::new(
            "urn:blattgold",
            ns::SKOS_ALT_LABEL,
            Term::lang_literal("Goldblatt", "de"),
        ));
        triples.extend(concept("urn:laufen", "laufen"));
        triples
    }

    #[test]
    fn test_empty_input() {
        let result = annotate(
            "",
            &LabelMap::new(),
            &StemmedLabelMap::new(),
            &ConceptMap::new(),
            &AnnotateOptions::default(),
        );
        assert_eq!(result, AnnotationResult::default());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({"sentences": [], "concepts": []})
        );
    }

    #[test]
    fn test_empty_vocabulary_keeps_sentences() {
        let result = annotate(
            "Erster Satz. Zweiter Satz.",
            &LabelMap::new(),
            &StemmedLabelMap::new(),
            &ConceptMap::new(),
            &AnnotateOptions::default(),
        );
        assert_eq!(result.sentences.len(), 2);
        assert!(result.concepts.is_empty());
        for sentence in &result.sentences {
            assert_eq!(sentence.segments.len(), 1);
            assert!(!sentence.segments[0].highlighted);
        }
    }

    #[test]
    fn test_literal_match_reports_concept() {
        let (labels, concepts) = single_concept("Email", "urn:c1");
        let stemmed = build_stemmed_label_map(&labels);
        let result = annotate(
            "Die Zellen werden mit Email gefüllt.",
            &labels,
            &stemmed,
            &concepts,
            &AnnotateOptions::default(),
        );

        assert_eq!(result.concepts, vec![Concept::new("urn:c1", "Email")]);
        let highlights: Vec<&str> = result.sentences[0]
            .highlights()
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(highlights, vec!["Email"]);

        let json = serde_json::to_value(&result.concepts[0]).unwrap();
        assert_eq!(json["altLabels"], serde_json::json!([]));
        assert!(json.get("definition").is_none());
    }

    #[test]
    fn test_stem_match_without_literal_occurrence() {
        let (labels, concepts) = single_concept("laufen", "urn:l");
        let stemmed = build_stemmed_label_map(&labels);
        let text = "Die Farbe läuft aus.";

        let literal = annotate(text, &labels, &stemmed, &concepts, &AnnotateOptions::default());
        assert!(literal.concepts.is_empty());

        let result = annotate(text, &labels, &stemmed, &concepts, &AnnotateOptions::stemmed());
        assert_eq!(result.concepts.len(), 1);
        let segment = result.sentences[0].highlights().next().unwrap();
        assert_eq!(segment.text, "läuft");
    }

    #[test]
    fn test_missing_concept_is_skipped() {
        let labels: LabelMap = [("Gold", "urn:gone"), ("Gold", "urn:gold")].into_iter().collect();
        let concepts: ConceptMap = [Concept::new("urn:gold", "Gold")].into_iter().collect();
        let result = annotate(
            "Gold glänzt.",
            &labels,
            &StemmedLabelMap::new(),
            &concepts,
            &AnnotateOptions::default(),
        );

        assert_eq!(result.concepts, vec![Concept::new("urn:gold", "Gold")]);
        let segment = result.sentences[0].highlights().next().unwrap();
        assert_eq!(segment.uris.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_concepts_deduplicated_across_sentences() {
        let (labels, concepts) = single_concept("Email", "urn:c1");
        let result = annotate(
            "Email hier. Email dort. Und wieder Email.",
            &labels,
            &StemmedLabelMap::new(),
            &concepts,
            &AnnotateOptions::default(),
        );
        assert_eq!(result.highlight_count(), 3);
        assert_eq!(result.concepts.len(), 1);
    }

    #[test]
    fn test_sentence_offsets() {
        let text = "Erster Satz. Zweiter Satz.";
        let result = annotate(
            text,
            &LabelMap::new(),
            &StemmedLabelMap::new(),
            &ConceptMap::new(),
            &AnnotateOptions::default(),
        );
        for sentence in &result.sentences {
            assert_eq!(
                &text[sentence.offset..sentence.offset + sentence.text.len()],
                sentence.text
            );
        }
    }

    #[test]
    fn test_structural_concept_never_annotated() {
        let vocabulary = Vocabulary::from_triples(&skos_triples(), &VocabularyOptions::default());
        assert!(!vocabulary.concepts().contains("urn:technik"));

        let annotator = Annotator::new(vocabulary);
        let result = annotator.run("Technik mit Goldblatt und Email.");

        let uris: Vec<&str> = result.concepts.iter().map(|c| c.uri.as_str()).collect();
        assert_eq!(uris, vec!["urn:blattgold", "urn:email"]);
    }

    #[test]
    fn test_annotator_default_options() {
        let vocabulary = Vocabulary::from_triples(&skos_triples(), &VocabularyOptions::default());
        let annotator = Annotator::new(vocabulary).with_options(AnnotateOptions::stemmed());

        let concepts = annotator.concepts_in("Es läuft.");
        assert_eq!(concepts.len(), 1);
        assert_eq!(concepts[0].uri, "urn:laufen");
    }

    #[test]
    fn test_cancelled_before_first_sentence() {
        let (labels, concepts) = single_concept("Email", "urn:c1");
        let cancel = CancellationFlag::new();
        cancel.cancel();

        let result = annotate_with_cancel(
            "Email.",
            &labels,
            &StemmedLabelMap::new(),
            &concepts,
            &AnnotateOptions::default(),
            &cancel,
        );
        assert!(matches!(result, Err(ThesaError::Cancelled)));
    }

    #[test]
    fn test_not_cancelled_matches_plain_annotate() {
        let vocabulary = Vocabulary::from_triples(&skos_triples(), &VocabularyOptions::default());
        let annotator = Annotator::new(vocabulary);
        let text = "Blattgold und Email. Die Farbe läuft.";
        let options = AnnotateOptions::stemmed();

        let plain = TextAnnotator::annotate(&annotator, text, &options);
        let cancellable = annotator
            .annotate_with_cancel(text, &options, &CancellationFlag::new())
            .unwrap();
        assert_eq!(plain, cancellable);
    }

    #[test]
    fn test_annotator_matches_free_function() {
        let vocabulary = Vocabulary::from_triples(&skos_triples(), &VocabularyOptions::default());
        let text = "Blattgold und Email. Die Farbe läuft.";

        for options in [AnnotateOptions::default(), AnnotateOptions::stemmed()] {
            let direct = annotate(
                text,
                vocabulary.labels(),
                vocabulary.stemmed(),
                vocabulary.concepts(),
                &options,
            );
            let annotator = Annotator::new(vocabulary.clone());
            assert_eq!(TextAnnotator::annotate(&annotator, text, &options), direct);
        }
    }

    #[test]
    fn test_cancellation_flag_shared_by_clones() {
        let (labels, concepts) = single_concept("Email", "urn:c1");
        let cancel = CancellationFlag::new();
        let text = "Email eins. Email zwei.";

        let done = annotate_with_cancel(
            text,
            &labels,
            &StemmedLabelMap::new(),
            &concepts,
            &AnnotateOptions::default(),
            &cancel,
        )
        .unwrap();
        assert_eq!(done.sentences.len(), 2);

        let clone = cancel.clone();
        clone.cancel();
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn test_multi_word_label_with_double_space() {
        let (labels, concepts) = single_concept("rotes Gold", "urn:rg");
        let result = annotate(
            "Aus rotes  Gold gefertigt.",
            &labels,
            &StemmedLabelMap::new(),
            &concepts,
            &AnnotateOptions::default(),
        );

        assert_eq!(result.concepts.len(), 1);
        let segment = result.sentences[0].highlights().next().unwrap();
        assert_eq!(segment.text, "rotes  Gold");
    }

    #[test]
    fn test_annotator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Annotator>();
    }

    proptest! {
        #[test]
        fn prop_annotate_deterministic_and_covering(
            text in "[A-Za-zäöü .,!?]{0,80}",
            use_stem in any::<bool>(),
        ) {
            let labels: LabelMap = [
                ("Gold", "urn:g"),
                ("Au", "urn:au"),
                ("Email", "urn:e"),
                ("laufen", "urn:l"),
            ]
            .into_iter()
            .collect();
            let stemmed = build_stemmed_label_map(&labels);
            let concepts = ConceptMap::new();
            let options = AnnotateOptions { use_stem };

            let first = annotate(&text, &labels, &stemmed, &concepts, &options);
            let second = annotate(&text, &labels, &stemmed, &concepts, &options);
            prop_assert_eq!(&first, &second);

            let rebuilt: String = first
                .sentences
                .iter()
                .flat_map(|s| s.segments.iter().map(|seg| seg.text.as_str()))
                .collect();
            prop_assert_eq!(rebuilt, text);
        }
    }
}

//! Turtle reader
//!
//! SKOS thesauri are usually published as Turtle. Prefixes, the `a` keyword
//! and predicate/object lists are resolved by `rio_turtle`; the reader only
//! converts its triples into the [`thesa_core::Triple`] model. Quoted
//! (RDF-star) triples have no SKOS meaning and are dropped.

use oxiri::Iri;
use rio_api::model::{Literal, Subject, Term as RioTerm, Triple as RioTriple};
use rio_api::parser::TriplesParser;
use rio_turtle::{TurtleError, TurtleParser as RioTurtleParser};
use thesa_core::{Term, Triple};

use crate::{ParserError, Result, TripleParser, VocabularyFormat};

/// Base IRI relative references (`<#gold>`) resolve against by default
pub const DEFAULT_BASE_IRI: &str = "https://example.org/resource.ttl";

/// Reader for Turtle documents
#[derive(Debug, Clone)]
pub struct TurtleParser {
    base_iri: String,
}

impl TurtleParser {
    pub fn new() -> Self {
        Self::with_base(DEFAULT_BASE_IRI)
    }

    /// Resolve relative IRIs against `base_iri` instead of the default
    pub fn with_base(base_iri: impl Into<String>) -> Self {
        Self {
            base_iri: base_iri.into(),
        }
    }

    pub fn base_iri(&self) -> &str {
        &self.base_iri
    }
}

impl Default for TurtleParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TripleParser for TurtleParser {
    fn parse_str(&self, content: &str) -> Result<Vec<Triple>> {
        let base = Iri::parse(self.base_iri.clone()).map_err(|e| {
            ParserError::Turtle(format!("invalid base IRI '{}': {}", self.base_iri, e))
        })?;

        let mut triples = Vec::new();
        let mut dropped = 0usize;

        RioTurtleParser::new(content.as_bytes(), Some(base))
            .parse_all(&mut |triple| {
                match convert(&triple) {
                    Some(triple) => triples.push(triple),
                    None => dropped += 1,
                }
                Ok(()) as std::result::Result<(), TurtleError>
            })
            .map_err(|e| ParserError::Turtle(e.to_string()))?;

        if dropped > 0 {
            tracing::debug!("Dropped {} quoted triples", dropped);
        }
        Ok(triples)
    }

    fn supported_formats(&self) -> &[VocabularyFormat] {
        &[VocabularyFormat::Turtle]
    }
}

/// Convert a `rio` triple; `None` for RDF-star terms
pub(crate) fn convert(triple: &RioTriple<'_>) -> Option<Triple> {
    let subject = match triple.subject {
        Subject::NamedNode(node) => node.iri.to_string(),
        Subject::BlankNode(node) => format!("_:{}", node.id),
        #[allow(unreachable_patterns)]
        _ => return None,
    };

    let object = match triple.object {
        RioTerm::NamedNode(node) => Term::iri(node.iri),
        RioTerm::BlankNode(node) => Term::BlankNode {
            value: format!("_:{}", node.id),
        },
        RioTerm::Literal(Literal::Simple { value }) => Term::literal(value),
        // Language tags compare case-insensitively; store them lower-cased
        RioTerm::Literal(Literal::LanguageTaggedString { value, language }) => {
            Term::lang_literal(value, language.to_ascii_lowercase())
        }
        RioTerm::Literal(Literal::Typed { value, datatype }) => Term::Literal {
            value: value.to_string(),
            language: None,
            datatype: Some(datatype.iri.to_string()),
        },
        #[allow(unreachable_patterns)]
        _ => return None,
    };

    Some(Triple::new(subject, triple.predicate.iri, object))
}

#[cfg(test)]
mod tests {
    use super::*;
    use thesa_core::ns;

    const THESAURUS: &str = r#"
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
@prefix ex: <http://example.org/thesaurus/> .

ex:email a skos:Concept ;
    skos:prefLabel "Email"@de, "enamel"@en ;
    skos:altLabel "Emaille"@de ;
    skos:definition "Glasartiger Überzug auf Metall"@de .

ex:technik a skos:Concept ;
    skos:prefLabel "[Technik]"@de .
"#;

    const RELATIVE: &str = r#"
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
<#gold> a skos:Concept ; skos:prefLabel "Gold"@de .
"#;

    #[test]
    fn test_parse_skos_turtle() {
        let triples = TurtleParser::new().parse_str(THESAURUS).unwrap();
        assert_eq!(triples.len(), 7);

        assert_eq!(triples[0].subject, "http://example.org/thesaurus/email");
        assert!(triples[0].is_concept_typing());
        assert_eq!(triples[1].predicate, ns::SKOS_PREF_LABEL);
        assert_eq!(triples[1].object, Term::lang_literal("Email", "de"));
        assert_eq!(triples[2].object, Term::lang_literal("enamel", "en"));
        assert_eq!(triples[3].predicate, ns::SKOS_ALT_LABEL);
    }

    #[test]
    fn test_relative_iris_resolve_against_default_base() {
        let triples = TurtleParser::new().parse_str(RELATIVE).unwrap();

        assert_eq!(triples.len(), 2);
        assert_eq!(triples[0].subject, "https://example.org/resource.ttl#gold");
        assert!(triples[0].is_concept_typing());
        assert_eq!(triples[1].object, Term::lang_literal("Gold", "de"));
    }

    #[test]
    fn test_relative_iris_resolve_against_custom_base() {
        let parser = TurtleParser::with_base("http://thesaurus.example/metall");
        let triples = parser.parse_str(RELATIVE).unwrap();
        assert_eq!(triples[0].subject, "http://thesaurus.example/metall#gold");
    }

    #[test]
    fn test_invalid_base_iri() {
        let err = TurtleParser::with_base("no scheme").parse_str(RELATIVE).unwrap_err();
        assert!(matches!(err, ParserError::Turtle(msg) if msg.contains("base IRI")));
    }

    #[test]
    fn test_blank_nodes_and_typed_literals() {
        let content = r#"_:b0 <urn:p> "3"^^<http://www.w3.org/2001/XMLSchema#integer> ."#;
        let triples = TurtleParser::new().parse_str(content).unwrap();

        assert!(triples[0].subject.starts_with("_:"));
        assert_eq!(
            triples[0].object,
            Term::Literal {
                value: "3".to_string(),
                language: None,
                datatype: Some("http://www.w3.org/2001/XMLSchema#integer".to_string()),
            }
        );
    }

    #[test]
    fn test_undefined_prefix_is_error() {
        let err = TurtleParser::new().parse_str("ex:a ex:b ex:c .").unwrap_err();
        assert!(matches!(err, ParserError::Turtle(_)));
    }

    #[test]
    fn test_empty_document() {
        assert!(TurtleParser::new().parse_str("").unwrap().is_empty());
    }
}

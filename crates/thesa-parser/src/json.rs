//! JSON triple reader
//!
//! Accepts an array of triples in the serde shape of [`thesa_core::Triple`]:
//!
//! ```json
//! [{"subject": "urn:c1",
//!   "predicate": "http://www.w3.org/2004/02/skos/core#prefLabel",
//!   "object": {"type": "literal", "value": "Email", "language": "de"}}]
//! ```

use thesa_core::Triple;

use crate::{ParserError, Result, TripleParser, VocabularyFormat};

/// Reader for JSON-serialized triples
pub struct JsonTripleParser;

impl TripleParser for JsonTripleParser {
    fn parse_str(&self, content: &str) -> Result<Vec<Triple>> {
        serde_json::from_str(content).map_err(|e| ParserError::Json(e.to_string()))
    }

    fn supported_formats(&self) -> &[VocabularyFormat] {
        &[VocabularyFormat::Json]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thesa_core::{ns, Term};

    #[test]
    fn test_parse_json_triples() {
        let content = r#"[
            {"subject": "urn:c1", "predicate": "http://www.w3.org/1999/02/22-rdf-syntax-ns#type",
             "object": {"type": "iri", "value": "http://www.w3.org/2004/02/skos/core#Concept"}},
            {"subject": "urn:c1", "predicate": "http://www.w3.org/2004/02/skos/core#prefLabel",
             "object": {"type": "literal", "value": "Email", "language": "de"}}
        ]"#;

        let triples = JsonTripleParser.parse_str(content).unwrap();
        assert_eq!(triples.len(), 2);
        assert!(triples[0].is_concept_typing());
        assert_eq!(triples[1].predicate, ns::SKOS_PREF_LABEL);
        assert_eq!(triples[1].object, Term::lang_literal("Email", "de"));
    }

    #[test]
    fn test_invalid_json() {
        let err = JsonTripleParser.parse_str("{not json").unwrap_err();
        assert!(matches!(err, ParserError::Json(_)));
    }
}

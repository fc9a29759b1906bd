//! N-Triples reader
//!
//! One statement per line: `subject predicate object .` where subjects are
//! `<iri>` or `_:label`, predicates are `<iri>` and objects are IRIs, blank
//! nodes or literals with an optional `@lang` tag or `^^<datatype>`.
//! Statements are read by `rio_turtle`; a malformed statement is reported
//! with its 1-based line number.

use rio_api::parser::{ParseError, TriplesParser};
use rio_turtle::{NTriplesParser as RioNTriplesParser, TurtleError};
use thesa_core::Triple;

use crate::turtle::convert;
use crate::{ParserError, Result, TripleParser, VocabularyFormat};

/// Line-based N-Triples parser
pub struct NTriplesParser;

impl TripleParser for NTriplesParser {
    fn parse_str(&self, content: &str) -> Result<Vec<Triple>> {
        let mut triples = Vec::new();

        RioNTriplesParser::new(content.as_bytes())
            .parse_all(&mut |triple| {
                triples.extend(convert(&triple));
                Ok(()) as std::result::Result<(), TurtleError>
            })
            .map_err(syntax_error)?;

        Ok(triples)
    }

    fn supported_formats(&self) -> &[VocabularyFormat] {
        &[VocabularyFormat::NTriples]
    }
}

fn syntax_error(error: TurtleError) -> ParserError {
    let line = error
        .textual_position()
        .map(|position| position.line_number() as usize + 1)
        .unwrap_or(0);

    ParserError::Syntax {
        line,
        message: error.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use thesa_core::{ns, Term};

    fn parse(content: &str) -> Result<Vec<Triple>> {
        NTriplesParser.parse_str(content)
    }

    #[test]
    fn test_parse_concept_statements() {
        let content = r#"
# sample thesaurus
<urn:c1> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2004/02/skos/core#Concept> .
<urn:c1> <http://www.w3.org/2004/02/skos/core#prefLabel> "Email"@de .
<urn:c1> <http://www.w3.org/2004/02/skos/core#altLabel> "Emaille"@DE .
"#;
        let triples = parse(content).unwrap();

        assert_eq!(triples.len(), 3);
        assert!(triples[0].is_concept_typing());
        assert_eq!(triples[1].predicate, ns::SKOS_PREF_LABEL);
        assert_eq!(triples[1].object, Term::lang_literal("Email", "de"));
        assert_eq!(triples[2].object.language(), Some("de"));
    }

    #[test]
    fn test_parse_escapes_and_datatypes() {
        let content = concat!(
            r#"<urn:c1> <urn:p> "Zeile\n\"zitiert\" Müller" ."#,
            "\n",
            r#"<urn:c1> <urn:p> "42"^^<http://www.w3.org/2001/XMLSchema#integer> ."#
        );
        let triples = parse(content).unwrap();

        assert_eq!(triples[0].object.value(), "Zeile\n\"zitiert\" Müller");
        assert_eq!(
            triples[1].object,
            Term::Literal {
                value: "42".to_string(),
                language: None,
                datatype: Some("http://www.w3.org/2001/XMLSchema#integer".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_blank_nodes() {
        let triples = parse("_:b0 <urn:p> _:b1 .\n").unwrap();
        assert_eq!(triples[0].subject, "_:b0");
        assert_eq!(triples[0].object, Term::BlankNode { value: "_:b1".to_string() });
    }

    #[test]
    fn test_blank_node_label_with_period() {
        let triples = parse("_:a.b <urn:p> <urn:o> .").unwrap();
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].subject, "_:a.b");
        assert_eq!(triples[0].object, Term::iri("urn:o"));
    }

    #[test]
    fn test_trailing_comment_allowed() {
        let triples = parse("<urn:a> <urn:p> <urn:b> . # note").unwrap();
        assert_eq!(triples.len(), 1);
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let content = "<urn:a> <urn:p> <urn:b> .\n<urn:a> urn:p <urn:b> .\n";
        let err = parse(content).unwrap_err();
        assert!(matches!(err, ParserError::Syntax { line: 2, .. }));
    }

    #[test]
    fn test_missing_terminator() {
        let err = parse("<urn:a> <urn:p> <urn:b>").unwrap_err();
        assert!(matches!(err, ParserError::Syntax { line: 1, .. }));
    }
}

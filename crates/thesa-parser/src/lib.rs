//! Thesa Parser - Triple readers for vocabulary files
//!
//! Supports reading of:
//! - Turtle (`.ttl`, `.turtle`)
//! - N-Triples (`.nt`, `.ntriples`)
//! - JSON arrays of serialized triples (`.json`)
//!
//! Each reader implements the `TripleParser` trait and produces the
//! `Vec<Triple>` snapshot the vocabulary loader consumes.

pub mod json;
pub mod ntriples;
pub mod turtle;

pub use json::JsonTripleParser;
pub use ntriples::NTriplesParser;
pub use turtle::{TurtleParser, DEFAULT_BASE_IRI};

use std::path::Path;

use thesa_core::Triple;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while reading triples
#[derive(Error, Debug)]
pub enum ParserError {
    /// File format is not supported
    #[error("Unsupported vocabulary format: {0}")]
    UnsupportedFormat(String),

    /// IO error while reading the file
    #[error("IO error reading file: {path}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed N-Triples statement
    #[error("Syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// Malformed Turtle document
    #[error("Turtle error: {0}")]
    Turtle(String),

    /// Malformed JSON triple document
    #[error("JSON triple error: {0}")]
    Json(String),
}

pub type Result<T> = std::result::Result<T, ParserError>;

// ============================================================================
// Formats
// ============================================================================

/// Supported vocabulary serializations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VocabularyFormat {
    Turtle,
    NTriples,
    Json,
    Unknown,
}

impl VocabularyFormat {
    /// Detect format from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "ttl" | "turtle" => Self::Turtle,
            "nt" | "ntriples" => Self::NTriples,
            "json" => Self::Json,
            _ => Self::Unknown,
        }
    }

    /// Detect format from path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }
}

impl std::str::FromStr for VocabularyFormat {
    type Err = ParserError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "turtle" | "ttl" => Ok(Self::Turtle),
            "ntriples" | "n-triples" | "nt" => Ok(Self::NTriples),
            "json" => Ok(Self::Json),
            _ => Err(ParserError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for VocabularyFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Turtle => write!(f, "turtle"),
            Self::NTriples => write!(f, "ntriples"),
            Self::Json => write!(f, "json"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

// ============================================================================
// Parser Trait
// ============================================================================

/// Trait for triple readers
pub trait TripleParser: Send + Sync {
    /// Parse serialized content
    fn parse_str(&self, content: &str) -> Result<Vec<Triple>>;

    /// Get supported formats
    fn supported_formats(&self) -> &[VocabularyFormat];

    /// Check if this parser can handle a format
    fn can_parse(&self, format: VocabularyFormat) -> bool {
        self.supported_formats().contains(&format)
    }

    /// Parse a vocabulary file
    fn parse(&self, path: &Path) -> Result<Vec<Triple>> {
        let content = std::fs::read_to_string(path).map_err(|e| ParserError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;
        self.parse_str(&content)
    }
}

// ============================================================================
// Parser Registry
// ============================================================================

/// Registry of available triple readers
pub struct ParserRegistry {
    parsers: Vec<Box<dyn TripleParser>>,
}

impl ParserRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Create a registry with the built-in readers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(TurtleParser::new());
        registry.register(NTriplesParser);
        registry.register(JsonTripleParser);
        registry
    }

    /// Register a parser
    pub fn register<P: TripleParser + 'static>(&mut self, parser: P) {
        self.parsers.push(Box::new(parser));
    }

    /// Find a parser for a format
    pub fn find_parser(&self, format: VocabularyFormat) -> Option<&dyn TripleParser> {
        self.parsers
            .iter()
            .find(|p| p.can_parse(format))
            .map(|p| p.as_ref())
    }

    /// Parse content of a known format
    pub fn parse_str(&self, format: VocabularyFormat, content: &str) -> Result<Vec<Triple>> {
        let parser = self
            .find_parser(format)
            .ok_or_else(|| ParserError::UnsupportedFormat(format.to_string()))?;
        parser.parse_str(content)
    }

    /// Parse a file using the parser matching its extension
    pub fn parse(&self, path: &Path) -> Result<Vec<Triple>> {
        let format = VocabularyFormat::from_path(path);

        if format == VocabularyFormat::Unknown {
            return Err(ParserError::UnsupportedFormat(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("none")
                    .to_string(),
            ));
        }

        let parser = self
            .find_parser(format)
            .ok_or_else(|| ParserError::UnsupportedFormat(format.to_string()))?;

        let triples = parser.parse(path)?;
        tracing::debug!(
            "Read {} triples from {} ({})",
            triples.len(),
            path.display(),
            format
        );
        Ok(triples)
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// Tests
// ============================================================================

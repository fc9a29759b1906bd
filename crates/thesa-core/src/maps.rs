//! Vocabulary lookup structures
//!
//! All maps keep insertion order so that iteration, and therefore every
//! annotation built on top of it, is deterministic.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::Concept;

/// Bracketed qualifier, e.g. `(Werkstoff)` or `[veraltet]`. Not nested.
static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[(\[][^()\[\]]*[)\]]").expect("static regex"));

/// Normalize a label for use as a LabelMap key
///
/// Removes every bracketed qualifier and trims surrounding whitespace.
pub fn normalize_label(label: &str) -> String {
    BRACKETED.replace_all(label, "").trim().to_string()
}

// ============================================================================
// Label Index
// ============================================================================

/// Ordered mapping from a label key to an ordered, deduplicated set of concept URIs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelIndex {
    entries: Vec<(String, Vec<String>)>,
    positions: HashMap<String, usize>,
}

impl LabelIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `uri` to the set stored under `key`. Returns false if it was already there.
    pub fn insert(&mut self, key: impl Into<String>, uri: impl Into<String>) -> bool {
        let key = key.into();
        let uri = uri.into();

        match self.positions.get(&key) {
            Some(&pos) => {
                let uris = &mut self.entries[pos].1;
                if uris.contains(&uri) {
                    false
                } else {
                    uris.push(uri);
                    true
                }
            }
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, vec![uri]));
                true
            }
        }
    }

    /// Union `uris` into the set stored under `key`, keeping first-seen order
    pub fn extend<'a, I>(&mut self, key: &str, uris: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        for uri in uris {
            self.insert(key, uri.as_str());
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.positions
            .get(key)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    /// Iterate `(key, uris)` in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, uris)| (key.as_str(), uris.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for LabelIndex {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, uris) in &self.entries {
            map.serialize_entry(key, uris)?;
        }
        map.end()
    }
}

// ============================================================================
// Label Map
// ============================================================================

/// Surface label -> concept URIs
///
/// Keys are normalized with [`normalize_label`] exactly once, on insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LabelMap {
    index: LabelIndex,
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw label for a concept
    ///
    /// Returns the normalized key, or `None` when the label normalizes to
    /// an empty string and was not inserted.
    pub fn insert(&mut self, label: &str, uri: &str) -> Option<String> {
        let key = normalize_label(label);
        if key.is_empty() {
            return None;
        }
        self.index.insert(key.clone(), uri);
        Some(key)
    }

    pub fn get(&self, label: &str) -> Option<&[String]> {
        self.index.get(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.index.iter()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Borrow as a generic label index for matching
    pub fn as_index(&self) -> &LabelIndex {
        &self.index
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for LabelMap {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (label, uri) in iter {
            map.insert(label, uri);
        }
        map
    }
}

// ============================================================================
// Stemmed Label Map
// ============================================================================

/// Stem -> concept URIs
///
/// A pure function of a [`LabelMap`]; it is built by the annotator's stem
/// index builder and never edited independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StemmedLabelMap {
    index: LabelIndex,
}

impl StemmedLabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an index whose keys are already stems
    pub fn from_index(index: LabelIndex) -> Self {
        Self { index }
    }

    pub fn get(&self, stem: &str) -> Option<&[String]> {
        self.index.get(stem)
    }

    pub fn contains_key(&self, stem: &str) -> bool {
        self.index.contains_key(stem)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.index.iter()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn as_index(&self) -> &LabelIndex {
        &self.index
    }
}

// ============================================================================
// Concept Map
// ============================================================================

/// URI -> Concept, in load order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConceptMap {
    concepts: Vec<Concept>,
    positions: HashMap<String, usize>,
}

impl ConceptMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a concept, replacing (in place) any concept with the same URI
    pub fn insert(&mut self, concept: Concept) -> Option<Concept> {
        match self.positions.get(&concept.uri) {
            Some(&pos) => Some(std::mem::replace(&mut self.concepts[pos], concept)),
            None => {
                self.positions
                    .insert(concept.uri.clone(), self.concepts.len());
                self.concepts.push(concept);
                None
            }
        }
    }

    pub fn get(&self, uri: &str) -> Option<&Concept> {
        self.positions.get(uri).map(|&pos| &self.concepts[pos])
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.positions.contains_key(uri)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.iter()
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }
}

impl FromIterator<Concept> for ConceptMap {
    fn from_iter<T: IntoIterator<Item = Concept>>(iter: T) -> Self {
        let mut map = Self::new();
        for concept in iter {
            map.insert(concept);
        }
        map
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Stemmed label index builder

use thesa_core::{LabelIndex, LabelMap, StemmedLabelMap};

use crate::matcher::is_case_sensitive;
use crate::stemmer::stem;
use crate::tokenizer::tokenize_words;

/// Build the stem -> URIs index from a label map
pub fn build_stemmed_label_map(labels: &LabelMap) -> StemmedLabelMap {
    build_stemmed_label_map_with(labels, false)
}

/// Build the stem index, optionally leaving out labels stemming does not shorten
///
/// Only labels that form a single token and are not all upper-case take
/// part; acronyms keep their exact form. Keys are lower-case. When several
/// labels collapse to one stem their URI sets are unioned in first-seen order.
pub fn build_stemmed_label_map_with(labels: &LabelMap, skip_unchanged: bool) -> StemmedLabelMap {
    let mut index = LabelIndex::new();

    for (label, uris) in labels.iter() {
        if tokenize_words(label).len() >= 2 || is_case_sensitive(label) {
            continue;
        }

        // Short words come back from the stemmer as they are; fold them here
        let stemmed = stem(&label.to_lowercase());
        if skip_unchanged && stemmed.chars().count() == label.chars().count() {
            continue;
        }
        index.extend(&stemmed, uris);
    }

    StemmedLabelMap::from_index(index)
}

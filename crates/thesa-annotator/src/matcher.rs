//! Label matcher
//!
//! Finds every occurrence of every label of a label index inside one
//! sentence. Two strategies:
//! - substring scan, for labels of at least [`SHORT_LABEL_CHARS`] characters
//!   and multi-word labels when stems are not compared
//! - per-token comparison, for short single-word labels and for every label
//!   when stem matching is requested
//!
//! Both strategies treat any run of whitespace as a single space, so a label
//! matches across double spaces and line breaks alike.
//!
//! Labels that are not entirely upper-case are matched case-insensitively;
//! all upper-case labels (acronyms) must match exactly.

use thesa_core::{LabelIndex, Match};

use crate::stemmer::stem;
use crate::tokenizer::{tokenize_words, words, Token};

/// Labels with fewer characters than this may only match whole words
pub const SHORT_LABEL_CHARS: usize = 4;

/// True for labels that equal their upper-case form
pub fn is_case_sensitive(label: &str) -> bool {
    label == label.to_uppercase()
}

/// Find all label occurrences in a sentence
///
/// Matches come back grouped by label in index order, and by position
/// within a label. Prepare a [`LabelPatterns`] instead when the same index
/// is matched against many sentences.
pub fn find_matches(sentence: &str, labels: &LabelIndex, use_stem: bool) -> Vec<Match> {
    LabelPatterns::new(labels, use_stem).find(sentence)
}

/// Occurrences of `label` as a substring, with overlapping starts allowed
///
/// Labels shorter than [`SHORT_LABEL_CHARS`] must additionally fill a
/// complete word.
pub fn substring_matches(sentence: &str, label: &str, uris: &[String]) -> Vec<Match> {
    let mut matches = Vec::new();
    let pattern = LabelPattern::substring(label, uris);
    SentenceView::new(sentence, false).scan(&pattern, false, &mut matches);
    matches
}

/// Occurrences of `label` as a run of whole word tokens
pub fn token_matches(sentence: &str, label: &str, uris: &[String], use_stem: bool) -> Vec<Match> {
    let mut matches = Vec::new();
    if let Some(pattern) = LabelPattern::tokens(label, uris, use_stem) {
        SentenceView::new(sentence, use_stem).scan(&pattern, use_stem, &mut matches);
    }
    matches
}

// ============================================================================
// Prepared labels
// ============================================================================

/// The labels of one index, split and folded once for matching many sentences
#[derive(Debug, Clone, Default)]
pub struct LabelPatterns {
    patterns: Vec<LabelPattern>,
    use_stem: bool,
}

impl LabelPatterns {
    pub fn new(labels: &LabelIndex, use_stem: bool) -> Self {
        let patterns = labels
            .iter()
            .map(|(label, uris)| LabelPattern::new(label, uris, use_stem))
            .collect();
        Self { patterns, use_stem }
    }

    /// Whether word stems are compared instead of surface forms
    pub fn use_stem(&self) -> bool {
        self.use_stem
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// All occurrences in one sentence, in label order
    pub fn find(&self, sentence: &str) -> Vec<Match> {
        let mut matches = Vec::new();
        if self.patterns.is_empty() {
            return matches;
        }

        let view = SentenceView::new(sentence, self.use_stem);
        for pattern in &self.patterns {
            view.scan(pattern, self.use_stem, &mut matches);
        }
        matches
    }
}

#[derive(Debug, Clone)]
struct LabelPattern {
    label: String,
    uris: Vec<String>,
    case_sensitive: bool,
    kind: PatternKind,
}

#[derive(Debug, Clone)]
enum PatternKind {
    /// Whitespace-collapsed label, lower-cased unless case-sensitive
    Substring { needle: String, short: bool },
    /// Per-word comparison forms and the normalized gaps between the words
    Tokens {
        forms: Vec<String>,
        separators: Vec<String>,
    },
}

impl LabelPattern {
    /// Token comparison only covers labels that start and end with a word;
    /// anything else ("Au.", "(Gold") keeps its punctuation in a substring scan
    fn new(label: &str, uris: &[String], use_stem: bool) -> Self {
        let tokens = tokenize_words(label);
        let word_edged = tokens.first().is_some_and(Token::is_word)
            && tokens.last().is_some_and(Token::is_word);
        let single_word = tokens.len() == 1 && word_edged;
        let short = label.chars().count() < SHORT_LABEL_CHARS;

        if (use_stem && word_edged) || (short && single_word) {
            if let Some(pattern) = Self::tokens(label, uris, use_stem) {
                return pattern;
            }
        }
        Self::substring(label, uris)
    }

    fn substring(label: &str, uris: &[String]) -> Self {
        let case_sensitive = is_case_sensitive(label);
        Self {
            label: label.to_string(),
            uris: uris.to_vec(),
            case_sensitive,
            kind: PatternKind::Substring {
                needle: FoldedText::new(label, !case_sensitive).text,
                short: label.chars().count() < SHORT_LABEL_CHARS,
            },
        }
    }

    /// `None` for labels without any word
    fn tokens(label: &str, uris: &[String], use_stem: bool) -> Option<Self> {
        let label_words = words(label);
        if label_words.is_empty() {
            return None;
        }

        let case_sensitive = is_case_sensitive(label);
        let forms = label_words
            .iter()
            .map(|w| label_form(w.text, case_sensitive, use_stem))
            .collect();
        let separators = label_words
            .windows(2)
            .map(|pair| normalize_separator(&label[pair[0].end()..pair[1].start]))
            .collect();

        Some(Self {
            label: label.to_string(),
            uris: uris.to_vec(),
            case_sensitive,
            kind: PatternKind::Tokens { forms, separators },
        })
    }
}

// ============================================================================
// Sentence view
// ============================================================================

/// Per-sentence data shared by every label lookup
struct SentenceView<'a> {
    text: &'a str,
    words: Vec<Token<'a>>,
    lowered: Vec<String>,
    stems: Vec<String>,
    /// Whitespace-collapsed and lower-cased
    folded: FoldedText,
    /// Whitespace-collapsed only, for case-sensitive labels
    collapsed: FoldedText,
}

impl<'a> SentenceView<'a> {
    fn new(text: &'a str, use_stem: bool) -> Self {
        let words = words(text);
        let lowered: Vec<String> = words.iter().map(|w| fold_case(w.text)).collect();
        let stems = if use_stem {
            lowered.iter().map(|w| stem(w)).collect()
        } else {
            Vec::new()
        };

        Self {
            text,
            words,
            lowered,
            stems,
            folded: FoldedText::new(text, true),
            collapsed: FoldedText::new(text, false),
        }
    }

    fn scan(&self, pattern: &LabelPattern, use_stem: bool, out: &mut Vec<Match>) {
        match &pattern.kind {
            PatternKind::Substring { needle, short } => {
                self.scan_substring(pattern, needle, *short, out)
            }
            PatternKind::Tokens { forms, separators } => {
                self.scan_tokens(pattern, forms, separators, use_stem, out)
            }
        }
    }

    fn scan_substring(
        &self,
        pattern: &LabelPattern,
        needle: &str,
        short: bool,
        out: &mut Vec<Match>,
    ) {
        let haystack = if pattern.case_sensitive {
            &self.collapsed
        } else {
            &self.folded
        };

        let Some(first) = needle.chars().next() else {
            return;
        };
        let step = first.len_utf8();

        let mut from = 0;
        while let Some(pos) = haystack.text[from..].find(needle) {
            let start = from + pos;
            let end = start + needle.len();
            from = start + step;

            let Some((start, end)) = haystack.original_range(start, end) else {
                continue;
            };
            if short && !is_word_bounded(self.text, start, end) {
                continue;
            }
            out.push(Match::new(start, end, pattern.label.as_str(), &pattern.uris));
        }
    }

    fn scan_tokens(
        &self,
        pattern: &LabelPattern,
        forms: &[String],
        separators: &[String],
        use_stem: bool,
        out: &mut Vec<Match>,
    ) {
        let n = forms.len();
        if n == 0 || self.words.len() < n {
            return;
        }

        for i in 0..=self.words.len() - n {
            let words_equal = (0..n)
                .all(|k| self.word_form(i + k, pattern.case_sensitive, use_stem) == forms[k]);
            if !words_equal {
                continue;
            }

            let separators_equal = (1..n).all(|k| {
                let gap = &self.text[self.words[i + k - 1].end()..self.words[i + k].start];
                normalize_separator(gap) == separators[k - 1]
            });
            if !separators_equal {
                continue;
            }

            out.push(Match::new(
                self.words[i].start,
                self.words[i + n - 1].end(),
                pattern.label.as_str(),
                &pattern.uris,
            ));
        }
    }

    fn word_form(&self, index: usize, case_sensitive: bool, use_stem: bool) -> &str {
        if case_sensitive {
            self.words[index].text
        } else if use_stem {
            &self.stems[index]
        } else {
            &self.lowered[index]
        }
    }
}

fn label_form(word: &str, case_sensitive: bool, use_stem: bool) -> String {
    if case_sensitive {
        word.to_string()
    } else if use_stem {
        stem(&fold_case(word))
    } else {
        fold_case(word)
    }
}

/// Collapse whitespace so that "Gold - Silber" and "Gold -  Silber" separate alike
fn normalize_separator(gap: &str) -> String {
    gap.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lower-case character by character, so folded offsets map back per character
fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// True when no letter directly precedes `start` or follows `end`
fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphabetic) && !after.is_some_and(char::is_alphabetic)
}

// ============================================================================
// Folding with offset mapping
// ============================================================================

/// Normalized copy of a text that remembers where each original character went
///
/// Every whitespace run becomes one space; with `lowercase` set, characters
/// are lower-cased as well.
struct FoldedText {
    text: String,
    /// `(folded offset, original offset)` per emitted character, plus the end
    spans: Vec<(usize, usize)>,
}

impl FoldedText {
    fn new(original: &str, lowercase: bool) -> Self {
        let mut text = String::with_capacity(original.len());
        let mut spans = Vec::with_capacity(original.len() + 1);
        let mut in_whitespace = false;

        for (offset, c) in original.char_indices() {
            if c.is_whitespace() {
                if in_whitespace {
                    continue;
                }
                in_whitespace = true;
                spans.push((text.len(), offset));
                text.push(' ');
                continue;
            }

            in_whitespace = false;
            spans.push((text.len(), offset));
            if lowercase {
                text.extend(c.to_lowercase());
            } else {
                text.push(c);
            }
        }
        spans.push((text.len(), original.len()));

        Self { text, spans }
    }

    fn original_offset(&self, folded: usize) -> Option<usize> {
        self.spans
            .binary_search_by_key(&folded, |&(f, _)| f)
            .ok()
            .map(|i| self.spans[i].1)
    }

    /// Map a folded range back; `None` if it cuts through a character's expansion
    fn original_range(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        Some((self.original_offset(start)?, self.original_offset(end)?))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn uris(uri: &str) -> Vec<String> {
        vec![uri.to_string()]
    }

    fn index(entries: &[(&str, &str)]) -> LabelIndex {
        let mut index = LabelIndex::new();
        for (label, uri) in entries {
            index.insert(*label, *uri);
        }
        index
    }

    fn spans<'a>(sentence: &'a str, matches: &[Match]) -> Vec<&'a str> {
        matches.iter().map(|m| &sentence[m.start..m.end]).collect()
    }

    #[test]
    fn test_case_insensitive_substring() {
        let sentence = "Email und EMAIL und email";
        let matches = substring_matches(sentence, "Email", &uris("urn:e"));
        assert_eq!(spans(sentence, &matches), vec!["Email", "EMAIL", "email"]);
    }

    #[test]
    fn test_acronyms_are_case_sensitive() {
        let sentence = "PVAC ist kein pvac";
        let matches = substring_matches(sentence, "PVAC", &uris("urn:p"));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].start, 0);
    }

    #[test]
    fn test_substring_matches_inside_words() {
        let sentence = "Die Emaillierung";
        let matches = substring_matches(sentence, "Email", &uris("urn:e"));
        assert_eq!(spans(sentence, &matches), vec!["Email"]);
    }

    #[test]
    fn test_short_substring_needs_word_boundary() {
        let sentence = "Das Auto mit Au.";
        let matches = substring_matches(sentence, "Au", &uris("urn:au"));
        assert_eq!(matches.len(), 1);
        assert_eq!(&sentence[matches[0].start..matches[0].end], "Au");
        assert_eq!(matches[0].start, 13);
    }

    #[test]
    fn test_short_label_does_not_match_inside_longer_word() {
        let labels = index(&[("Au", "urn:au")]);
        assert!(find_matches("Das Auto fährt.", &labels, false).is_empty());
        assert_eq!(find_matches("Die Au bei Wien.", &labels, false).len(), 1);
    }

    #[test]
    fn test_overlapping_starts_are_all_reported() {
        let sentence = "aaaaa";
        let matches = substring_matches(sentence, "aaaa", &uris("urn:a"));
        let starts: Vec<usize> = matches.iter().map(|m| m.start).collect();
        assert_eq!(starts, vec![0, 1]);
    }

    #[test]
    fn test_multi_byte_offsets() {
        let sentence = "Über Öl und Blattgold.";
        let labels = index(&[("Blattgold", "urn:g"), ("Öl", "urn:o")]);
        let matches = find_matches(sentence, &labels, false);
        assert_eq!(spans(sentence, &matches), vec!["Blattgold", "Öl"]);
    }

    #[test]
    fn test_folding_that_changes_length() {
        // 'İ' lower-cases to two characters
        let sentence = "İstanbul und Gold";
        let matches = substring_matches(sentence, "Gold", &uris("urn:g"));
        assert_eq!(spans(sentence, &matches), vec!["Gold"]);
    }

    #[test]
    fn test_stemmed_token_match() {
        let labels = index(&[("laufen", "urn:l")]);
        let sentence = "Die Farbe läuft an den Rändern.";

        assert!(find_matches(sentence, &labels, false).is_empty());

        let matches = find_matches(sentence, &labels, true);
        assert_eq!(spans(sentence, &matches), vec!["läuft"]);
        assert_eq!(matches[0].label, "laufen");
        assert_eq!(matches[0].uris, uris("urn:l"));
    }

    #[test]
    fn test_multi_word_label_in_stem_mode() {
        let sentence = "Mit roten Golden wurde gearbeitet.";
        let matches = token_matches(sentence, "rotes Gold", &uris("urn:rg"), true);
        assert_eq!(spans(sentence, &matches), vec!["roten Golden"]);
    }

    #[test]
    fn test_separator_must_agree() {
        let sentence = "E-Mail, E Mail und E - Mail";
        let matches = token_matches(sentence, "E-Mail", &uris("urn:e"), false);
        assert_eq!(spans(sentence, &matches), vec!["E-Mail", "E - Mail"]);
    }

    #[test]
    fn test_acronym_not_stemmed() {
        let labels = index(&[("NATO", "urn:n")]);
        assert!(find_matches("Die nato tagt.", &labels, true).is_empty());
        assert_eq!(find_matches("Die NATO tagt.", &labels, true).len(), 1);
    }

    #[test]
    fn test_matches_grouped_by_label_order() {
        let sentence = "Edelmetallblech";
        let labels = index(&[("Edelmetall", "urn:a"), ("Edelmetallblech", "urn:b")]);
        let matches = find_matches(sentence, &labels, false);

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].label, "Edelmetall");
        assert_eq!((matches[1].start, matches[1].end), (0, 15));
    }

    #[test]
    fn test_multi_word_label_across_whitespace_runs() {
        let labels = index(&[("rotes Gold", "urn:rg")]);

        let cases = [
            ("Aus rotes  Gold gefertigt.", "rotes  Gold"),
            ("Aus rotes\nGold gefertigt.", "rotes\nGold"),
        ];
        for (sentence, expected) in cases {
            let literal = find_matches(sentence, &labels, false);
            assert_eq!(spans(sentence, &literal), vec![expected]);

            let stemmed = find_matches(sentence, &labels, true);
            assert_eq!(
                (stemmed[0].start, stemmed[0].end),
                (literal[0].start, literal[0].end)
            );
        }
    }

    #[test]
    fn test_acronym_phrase_across_whitespace_runs() {
        let sentence = "Die EU  KOMMISSION tagt.";
        let matches = substring_matches(sentence, "EU KOMMISSION", &uris("urn:k"));
        assert_eq!(spans(sentence, &matches), vec!["EU  KOMMISSION"]);
    }

    #[test]
    fn test_prepared_patterns_agree_with_find_matches() {
        let labels = index(&[("Au", "urn:au"), ("Blattgold", "urn:g"), ("laufen", "urn:l")]);
        let sentences = ["Die Au mit Blattgold.", "Es läuft.", ""];

        for use_stem in [false, true] {
            let patterns = LabelPatterns::new(&labels, use_stem);
            assert_eq!(patterns.len(), 3);
            for sentence in sentences {
                assert_eq!(patterns.find(sentence), find_matches(sentence, &labels, use_stem));
            }
        }
    }

    #[test]
    fn test_short_label_keeps_its_punctuation() {
        let labels = index(&[("Au.", "urn:au")]);
        assert!(find_matches("Die Au bei Wien.", &labels, false).is_empty());
        assert!(find_matches("Die Au bei Wien.", &labels, true).is_empty());

        let sentence = "Siehe Au. oben";
        for use_stem in [false, true] {
            let matches = find_matches(sentence, &labels, use_stem);
            assert_eq!(spans(sentence, &matches), vec!["Au."]);
        }
    }

    #[test]
    fn test_empty_inputs() {
        let labels = index(&[("Gold", "urn:g")]);
        assert!(find_matches("", &labels, false).is_empty());
        assert!(find_matches("Gold", &LabelIndex::new(), true).is_empty());
        assert!(substring_matches("Gold", "", &uris("urn:x")).is_empty());
    }
}

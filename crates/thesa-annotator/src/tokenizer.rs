//! Sentence and word segmentation
//!
//! Built on the Unicode text segmentation rules (UAX #29), with a German
//! abbreviation pass on top: a sentence break directly after a known
//! abbreviation ("z.B.", "Dr.", "Nr.", ...) is suppressed. A break after a
//! one or two digit number ("3.") is suppressed only where the number reads
//! as an ordinal: after an article or preposition ("am 3."), or before a
//! month name or a lower-case word. "Es waren 12. Danach ..." still splits.
//! Neither exception holds across a line break.
//!
//! Quotation marks follow UAX #29: a closing „…“ quote stays with the
//! sentence it ends.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use unicode_segmentation::UnicodeSegmentation;

/// Common German abbreviations, lower-cased, including their final period
static ABBREVIATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "abb.", "abs.", "abschn.", "allg.", "anm.", "art.", "aufl.", "bd.", "bearb.", "bes.",
        "bspw.", "bzgl.", "bzw.", "ca.", "d.h.", "dgl.", "dr.", "ebd.", "etc.", "evtl.", "f.",
        "ff.", "frl.", "geb.", "gegr.", "ggf.", "hg.", "hr.", "hrsg.", "i.a.", "i.d.r.",
        "inkl.", "jh.", "jhd.", "jr.", "kap.", "lt.", "max.", "min.", "mio.", "mrd.", "nr.",
        "o.a.", "o.ä.", "prof.", "s.", "s.o.", "s.u.", "sog.", "spez.", "st.", "str.",
        "tab.", "u.a.", "u.ä.", "usw.", "v.a.", "v.chr.", "n.chr.", "vgl.", "z.b.", "z.t.",
        "zit.", "zzgl.",
    ]
    .into_iter()
    .collect()
});

/// Words after which a number followed by a period is read as an ordinal
static ORDINAL_CONTEXT: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "am", "im", "vom", "zum", "zur", "bis", "ab", "seit", "der", "die", "das", "den", "dem",
        "des",
    ]
    .into_iter()
    .collect()
});

/// Words that mark a preceding number as a day or century
static ORDINAL_NOUNS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "januar", "februar", "märz", "april", "mai", "juni", "juli", "august", "september",
        "oktober", "november", "dezember", "jahrhundert", "jahrhunderts", "jh",
    ]
    .into_iter()
    .collect()
});

const OPENING_MARKS: &[char] = &['(', '"', '„', '»', '«', '\''];

/// A sentence slice of the input with its byte offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    pub text: &'a str,
    pub start: usize,
}

impl<'a> Sentence<'a> {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// A word, punctuation or whitespace token with its byte offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
}

impl<'a> Token<'a> {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    /// Word tokens contain at least one alphanumeric character
    pub fn is_word(&self) -> bool {
        self.text.chars().any(char::is_alphanumeric)
    }
}

/// Split text into sentences
///
/// Sentences are contiguous: concatenating them reproduces `text`, and
/// trailing whitespace stays with the sentence it follows.
pub fn tokenize_sentences(text: &str) -> Vec<Sentence<'_>> {
    let mut sentences: Vec<Sentence<'_>> = Vec::new();
    let mut pending: Option<(usize, usize)> = None;

    for (start, piece) in text.split_sentence_bound_indices() {
        let end = start + piece.len();
        let range = match pending.take() {
            Some((pending_start, _)) => (pending_start, end),
            None => (start, end),
        };

        if end < text.len() && suppresses_break(&text[range.0..range.1], &text[end..]) {
            pending = Some(range);
            continue;
        }

        sentences.push(Sentence {
            text: &text[range.0..range.1],
            start: range.0,
        });
    }

    if let Some((start, end)) = pending {
        sentences.push(Sentence {
            text: &text[start..end],
            start,
        });
    }

    sentences
}

/// Split text at word boundaries
///
/// Words, punctuation and whitespace runs come back as separate tokens.
pub fn tokenize_words(text: &str) -> Vec<Token<'_>> {
    text.split_word_bound_indices()
        .map(|(start, text)| Token { text, start })
        .collect()
}

/// Word tokens only
pub fn words(text: &str) -> Vec<Token<'_>> {
    tokenize_words(text)
        .into_iter()
        .filter(Token::is_word)
        .collect()
}

/// Whether the break after `sentence` is an abbreviation or ordinal period
fn suppresses_break(sentence: &str, rest: &str) -> bool {
    let trimmed = sentence.trim_end();
    if !trimmed.ends_with('.') {
        return false;
    }
    // Line breaks always end the sentence
    if sentence[trimmed.len()..].contains(is_line_break) {
        return false;
    }

    let mut tokens = trimmed.rsplit(char::is_whitespace).filter(|t| !t.is_empty());
    let last = tokens
        .next()
        .unwrap_or(trimmed)
        .trim_start_matches(OPENING_MARKS);

    if ABBREVIATIONS.contains(last.to_lowercase().as_str()) {
        return true;
    }

    let digits = &last[..last.len() - 1];
    let is_number =
        !digits.is_empty() && digits.len() <= 2 && digits.chars().all(|c| c.is_ascii_digit());
    if !is_number {
        return false;
    }

    // Day or ordinal number: "am 3. Oktober", "im 19. Jahrhundert", "3. und 4."
    let previous = tokens.next().map(str::to_lowercase);
    let next = rest
        .split_whitespace()
        .next()
        .unwrap_or("")
        .trim_start_matches(OPENING_MARKS)
        .trim_end_matches(|c: char| !c.is_alphanumeric());

    previous.is_some_and(|word| ORDINAL_CONTEXT.contains(word.as_str()))
        || next.chars().next().is_some_and(char::is_lowercase)
        || ORDINAL_NOUNS.contains(next.to_lowercase().as_str())
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

// ============================================================================
// Tests
// ============================================================================

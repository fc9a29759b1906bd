//! German stemmer (CISTEM)
//!
//! Rule-based suffix stripping after Weissweiler & Fraser (2017), run in
//! case-insensitive mode and repeated until a fixed point is reached so that
//! stemming a stem never changes it.
//!
//! One pass:
//! 1. lower-case, fold `ä ö ü` to `a o u` and `ß` to `ss`
//! 2. drop a leading `ge` when at least four characters follow, unless they
//!    start with `ge` again ("Gegenstand" keeps its prefix)
//! 3. encode `sch`, `ei`, `ie` and doubled letters as single placeholder characters
//! 4. strip suffixes while more than three characters remain:
//!    `em`/`er`/`nd` (only above five characters), then `t`, then `e`/`s`/`n`
//! 5. decode the placeholders

/// Words with fewer characters than this are returned unchanged
pub const MIN_STEM_CHARS: usize = 4;

// Placeholders from the private use area so they never collide with input text.
const SCH: char = '\u{E000}';
const EI: char = '\u{E001}';
const IE: char = '\u{E002}';
const DOUBLE: char = '\u{E003}';

/// Stem a single word
///
/// Words shorter than [`MIN_STEM_CHARS`] and words without any alphabetic
/// character pass through unchanged; everything else comes back lower-cased.
pub fn stem(word: &str) -> String {
    let length = word.chars().count();
    if length < MIN_STEM_CHARS || !word.chars().any(char::is_alphabetic) {
        return word.to_string();
    }

    let mut current = cistem_pass(word);
    // Every pass that changes an already folded word makes it shorter.
    let limit = current.chars().count();
    for _ in 0..=limit {
        let next = cistem_pass(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn cistem_pass(word: &str) -> String {
    let mut folded = String::with_capacity(word.len());
    for c in word.to_lowercase().chars() {
        match c {
            'ä' => folded.push('a'),
            'ö' => folded.push('o'),
            'ü' => folded.push('u'),
            'ß' => folded.push_str("ss"),
            c => folded.push(c),
        }
    }

    if strips_ge_prefix(&folded) {
        folded.drain(..2);
    }

    let mut chars = encode(&folded);
    strip_suffixes(&mut chars);
    decode(&chars)
}

/// A repeated `ge` stays, so a later pass has no prefix left to remove
fn strips_ge_prefix(folded: &str) -> bool {
    folded.starts_with("ge") && !folded[2..].starts_with("ge") && folded.chars().count() >= 6
}

fn encode(word: &str) -> Vec<char> {
    let replaced = word
        .replace("sch", &SCH.to_string())
        .replace("ei", &EI.to_string())
        .replace("ie", &IE.to_string());

    let mut out = Vec::with_capacity(replaced.len());
    let mut previous: Option<char> = None;
    for c in replaced.chars() {
        if previous == Some(c) {
            out.push(DOUBLE);
            previous = None;
        } else {
            out.push(c);
            previous = Some(c);
        }
    }
    out
}

fn strip_suffixes(chars: &mut Vec<char>) {
    while chars.len() > 3 {
        let n = chars.len();

        if n > 5 {
            let tail = (chars[n - 2], chars[n - 1]);
            if matches!(tail, ('e', 'm') | ('e', 'r') | ('n', 'd')) {
                chars.truncate(n - 2);
                continue;
            }
        }

        if matches!(chars[n - 1], 't' | 'e' | 's' | 'n') {
            chars.pop();
            continue;
        }

        break;
    }
}

fn decode(chars: &[char]) -> String {
    let mut out = String::with_capacity(chars.len() + 4);
    let mut previous: Option<char> = None;
    for &c in chars {
        let source = match (c, previous) {
            (DOUBLE, Some(p)) => p,
            _ => c,
        };
        match source {
            SCH => out.push_str("sch"),
            EI => out.push_str("ei"),
            IE => out.push_str("ie"),
            other => out.push(other),
        }
        previous = Some(source);
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

//! Span reconciliation
//!
//! Turns raw, possibly overlapping matches into a contiguous run of plain and
//! highlighted segments covering the whole sentence.

use thesa_core::{Match, Segment};

/// Resolve overlaps and segment a sentence
///
/// Matches are ordered by start offset; equal starts keep their incoming
/// order. A match that begins before the end of the previously kept match is
/// dropped, as is any empty or out-of-range span.
pub fn reconcile(sentence: &str, mut matches: Vec<Match>) -> Vec<Segment> {
    matches.sort_by_key(|m| m.start);

    let mut segments = Vec::new();
    let mut last_end = 0;

    for m in matches {
        if m.start < last_end || m.is_empty() {
            continue;
        }
        let Some(text) = sentence.get(m.start..m.end) else {
            continue;
        };

        if m.start > last_end {
            segments.push(Segment::plain(&sentence[last_end..m.start]));
        }
        segments.push(Segment::highlighted(text, m.label, m.uris));
        last_end = m.end;
    }

    if last_end < sentence.len() || segments.is_empty() {
        segments.push(Segment::plain(&sentence[last_end..]));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn m(start: usize, end: usize, label: &str) -> Match {
        Match::new(start, end, label, &[format!("urn:{label}")])
    }

    fn joined(segments: &[Segment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_no_matches_single_plain_segment() {
        let segments = reconcile("Kein Treffer hier.", Vec::new());
        assert_eq!(segments, vec![Segment::plain("Kein Treffer hier.")]);

        let segments = reconcile("", Vec::new());
        assert_eq!(segments, vec![Segment::plain("")]);
    }

    #[test]
    fn test_gaps_become_plain_segments() {
        let sentence = "Die Zellen werden mit Email gefüllt.";
        let segments = reconcile(sentence, vec![m(22, 27, "Email")]);

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], Segment::plain("Die Zellen werden mit "));
        assert!(segments[1].highlighted);
        assert_eq!(segments[1].text, "Email");
        assert_eq!(segments[1].uris.as_deref(), Some(&["urn:Email".to_string()][..]));
        assert_eq!(segments[2], Segment::plain(" gefüllt."));
    }

    #[test]
    fn test_equal_starts_keep_first_in_order() {
        let sentence = "Edelmetallblech";
        let segments = reconcile(
            sentence,
            vec![m(0, 10, "Edelmetall"), m(0, 15, "Edelmetallblech")],
        );

        let highlighted: Vec<&Segment> = segments.iter().filter(|s| s.highlighted).collect();
        assert_eq!(highlighted.len(), 1);
        assert_eq!(highlighted[0].label.as_deref(), Some("Edelmetall"));
        assert_eq!(segments.last().unwrap(), &Segment::plain("blech"));
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let sentence = "Gold und Silber";
        let segments = reconcile(sentence, vec![m(9, 15, "Silber"), m(0, 4, "Gold")]);

        let labels: Vec<&str> = segments.iter().filter_map(|s| s.label.as_deref()).collect();
        assert_eq!(labels, vec!["Gold", "Silber"]);
        assert_eq!(joined(&segments), sentence);
    }

    #[test]
    fn test_overlap_starting_inside_previous_is_dropped() {
        let sentence = "Blattgoldauflage";
        let segments = reconcile(sentence, vec![m(0, 9, "Blattgold"), m(5, 16, "goldauflage")]);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "Blattgold");
        assert_eq!(segments[1], Segment::plain("auflage"));
    }

    #[test]
    fn test_adjacent_matches_both_kept() {
        let sentence = "GoldSilber";
        let segments = reconcile(sentence, vec![m(0, 4, "Gold"), m(4, 10, "Silber")]);
        assert_eq!(segments.iter().filter(|s| s.highlighted).count(), 2);
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn test_invalid_spans_ignored() {
        let sentence = "Öl";
        // 1 is inside the two-byte 'Ö'
        let segments = reconcile(sentence, vec![m(1, 3, "x"), m(2, 2, "y"), m(0, 9, "z")]);
        assert_eq!(segments, vec![Segment::plain("Öl")]);
    }

    proptest! {
        #[test]
        fn prop_segments_cover_sentence(
            sentence in "[a-zäöü ]{0,40}",
            spans in proptest::collection::vec((0usize..48, 0usize..12), 0..8),
        ) {
            let matches: Vec<Match> = spans
                .iter()
                .map(|&(start, len)| m(start, start + len, "l"))
                .collect();
            let segments = reconcile(&sentence, matches);
            prop_assert_eq!(joined(&segments), sentence);
        }

        #[test]
        fn prop_highlights_never_overlap(
            sentence in "[a-z ]{1,40}",
            spans in proptest::collection::vec((0usize..40, 1usize..12), 0..8),
        ) {
            let matches: Vec<Match> = spans
                .iter()
                .map(|&(start, len)| m(start, start + len, "l"))
                .collect();
            let segments = reconcile(&sentence, matches);

            let mut offset = 0;
            let mut last_highlight_end = 0;
            for segment in &segments {
                if segment.highlighted {
                    prop_assert!(offset >= last_highlight_end);
                    last_highlight_end = offset + segment.text.len();
                }
                offset += segment.text.len();
            }
        }
    }
}

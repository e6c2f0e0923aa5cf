//! Itinerary segmentation: split an answer into per-day sections.
//!
//! Answers are free text, typically Markdown, with day boundaries written as
//! `Day 1:`, `day 2:`, `DAY 10:` … Two passes consume those boundaries and
//! both are built on [`find_markers`]:
//!
//! * [`parse_days`]: the structured list. Text before the first marker is
//!   dropped and each section's body is trimmed. No markers, no sections.
//! * [`split_cards`]: the card split used for rendering. The text is cut
//!   immediately before every marker, so any preamble becomes its own leading
//!   card and a marker-less answer becomes exactly one card.
//!
//! The two passes disagree on marker-less answers (zero sections vs. one
//! card). Both behaviours are relied on: the first decides whether the answer
//! is day-structured at all, the second decides what gets drawn.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static RE_DAY_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Day\s+[0-9]+:").unwrap());

/// One day-boundary marker found in an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayMarker {
    /// Byte offset of the `D` of `Day`.
    pub start: usize,
    /// Byte offset just past the `:`.
    pub end: usize,
    /// The matched text, e.g. `"Day 3:"`.
    pub text: String,
}

/// One heading + body unit derived from an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItinerarySection {
    pub heading: String,
    pub body: String,
}

impl ItinerarySection {
    pub fn new(heading: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            body: body.into(),
        }
    }
}

/// All non-overlapping `Day <digits>:` markers, left to right.
pub fn find_markers(text: &str) -> Vec<DayMarker> {
    RE_DAY_MARKER
        .find_iter(text)
        .map(|m| DayMarker {
            start: m.start(),
            end: m.end(),
            text: m.as_str().to_string(),
        })
        .collect()
}

/// Structured day list: one section per marker, preamble discarded.
///
/// The heading is the trimmed marker and the body is the trimmed text up to
/// the next marker (or the end of the answer). Everything after the marker
/// belongs to the body, including the rest of the marker's own line.
pub fn parse_days(text: &str) -> Vec<ItinerarySection> {
    let markers = find_markers(text);
    markers
        .iter()
        .enumerate()
        .map(|(i, marker)| {
            let body_end = markers.get(i + 1).map_or(text.len(), |next| next.start);
            ItinerarySection::new(marker.text.trim(), text[marker.end..body_end].trim())
        })
        .collect()
}

/// `true` when the answer contains at least one day marker.
pub fn is_day_structured(text: &str) -> bool {
    RE_DAY_MARKER.is_match(text)
}

/// Card split: cut before every marker, heading = first line of each chunk.
///
/// A marker at offset 0 does not produce an empty leading chunk. The body is
/// the chunk with the first occurrence of its first line removed, untrimmed.
pub fn split_cards(text: &str) -> Vec<ItinerarySection> {
    split_before_markers(text)
        .into_iter()
        .map(|chunk| {
            let heading = chunk.split('\n').next().unwrap_or_default();
            let body = chunk.replacen(heading, "", 1);
            ItinerarySection::new(heading, body)
        })
        .collect()
}

/// Zero-width split in front of each marker.
fn split_before_markers(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut last = 0;
    for marker in find_markers(text) {
        if marker.start == last {
            continue;
        }
        chunks.push(&text[last..marker.start]);
        last = marker.start;
    }
    chunks.push(&text[last..]);
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOA: &str = "Day 1: Arrive in Goa\nVisit beach.\nDay 2: City tour\nExplore fort.";

    #[test]
    fn markers_are_case_insensitive_and_ordered() {
        let markers = find_markers("intro day 1: a\nDAY  2: b\nDay 10: c");
        let texts: Vec<&str> = markers.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["day 1:", "DAY  2:", "Day 10:"]);
        assert_eq!(markers[0].start, 6);
        assert_eq!(markers[0].end, 12);
    }

    #[test]
    fn marker_requires_whitespace_digits_and_colon() {
        assert!(find_markers("Day1: no space").is_empty());
        assert!(find_markers("Day one: words").is_empty());
        assert!(find_markers("Day 1 - no colon").is_empty());
        assert_eq!(find_markers("Day\t3:tab").len(), 1);
    }

    #[test]
    fn parse_days_goa() {
        let days = parse_days(GOA);
        assert_eq!(
            days,
            vec![
                ItinerarySection::new("Day 1:", "Arrive in Goa\nVisit beach."),
                ItinerarySection::new("Day 2:", "City tour\nExplore fort."),
            ]
        );
    }

    #[test]
    fn parse_days_drops_preamble() {
        let days = parse_days("Here is your plan!\n\nDay 1: Beach\nDay 2: Fort\n\nEnjoy!");
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].body, "Beach");
        assert_eq!(days[1].body, "Fort\n\nEnjoy!");
    }

    #[test]
    fn parse_days_without_markers_is_empty() {
        assert!(parse_days("Just some prose about Goa.").is_empty());
        assert!(parse_days("").is_empty());
        assert!(!is_day_structured("Just some prose"));
    }

    #[test]
    fn parse_days_reconstructs_text_after_preamble() {
        let text = "Welcome\nDay 1: a b\n\nDay 2:\n  c\n";
        let rebuilt: String = parse_days(text)
            .iter()
            .map(|s| format!("{}{}", s.heading, s.body))
            .collect();
        let stripped: String = text[text.find("Day 1:").unwrap()..]
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let rebuilt_stripped: String = rebuilt.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(rebuilt_stripped, stripped);
    }

    #[test]
    fn empty_day_body_is_empty_string() {
        let days = parse_days("Day 1:Day 2: x");
        assert_eq!(days[0], ItinerarySection::new("Day 1:", ""));
        assert_eq!(days[1], ItinerarySection::new("Day 2:", "x"));
    }

    #[test]
    fn split_cards_with_preamble() {
        let cards = split_cards("Welcome!\nDay 1: Arrive");
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].heading, "Welcome!");
        assert!(cards[0].body.trim().is_empty());
        assert_eq!(cards[1], ItinerarySection::new("Day 1: Arrive", ""));
    }

    #[test]
    fn split_cards_starting_with_marker_has_no_empty_card() {
        let cards = split_cards(GOA);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].heading, "Day 1: Arrive in Goa");
        assert_eq!(cards[0].body, "\nVisit beach.\n");
        assert_eq!(cards[1].heading, "Day 2: City tour");
        assert_eq!(cards[1].body, "\nExplore fort.");
    }

    #[test]
    fn split_cards_without_markers_is_one_card() {
        let cards = split_cards("Top tips\nPack light.\nStay hydrated.");
        assert_eq!(
            cards,
            vec![ItinerarySection::new("Top tips", "\nPack light.\nStay hydrated.")]
        );
    }

    #[test]
    fn split_cards_empty_answer_is_one_empty_card() {
        assert_eq!(split_cards(""), vec![ItinerarySection::new("", "")]);
    }

    #[test]
    fn split_cards_leading_newline_gives_empty_heading() {
        let cards = split_cards("\nPlan below");
        assert_eq!(cards[0].heading, "");
        assert_eq!(cards[0].body, "\nPlan below");
    }

    #[test]
    fn split_cards_strips_only_first_occurrence_of_heading() {
        let cards = split_cards("Day 1: Goa\nDay 1: Goa again? no, Goa");
        // Second "Day 1:" is itself a marker, so it starts a new card.
        assert_eq!(cards.len(), 2);
        let cards = split_cards("Goa\nMore Goa\nGoa");
        assert_eq!(cards[0].heading, "Goa");
        assert_eq!(cards[0].body, "\nMore Goa\nGoa");
    }

    #[test]
    fn card_count_matches_marker_count() {
        let with_preamble = "Hi\nDay 1: a\nDay 2: b\nDay 3: c";
        assert_eq!(find_markers(with_preamble).len(), 3);
        assert_eq!(split_cards(with_preamble).len(), 4);
        let without = "Day 1: a\nDay 2: b\nDay 3: c";
        assert_eq!(split_cards(without).len(), 3);
    }

    #[test]
    fn crlf_heading_keeps_carriage_return() {
        let cards = split_cards("Day 1: Goa\r\nBeach");
        assert_eq!(cards[0].heading, "Day 1: Goa\r");
        assert_eq!(cards[0].body, "\nBeach");
    }
}

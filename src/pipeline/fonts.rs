//! Font coverage and metrics for drawing itinerary text.
//!
//! Without a configured TrueType font the region is drawn with pdfium's
//! built-in Helvetica faces, which only encode the WinAnsi character set.
//! pdfium drops anything outside it, so text is fitted to that set before
//! layout: common symbols get a readable stand-in (`₹` → `Rs.`) and the
//! rest are removed and reported, never lost silently.
//!
//! Widths come from the standard Helvetica AFM metrics so that wrapping
//! keeps wide capitals (`W`, `M`) inside the card.

use crate::pipeline::layout::FontStyle;
use crate::pipeline::segment::ItinerarySection;

/// WinAnsi code points 0x80–0x9F that are not Latin-1.
const WIN_ANSI_EXTRAS: &[char] = &[
    '€', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', 'Ž', '‘', '’', '“', '”', '•',
    '–', '—', '˜', '™', 'š', '›', 'œ', 'ž', 'Ÿ',
];

/// Helvetica advance widths for `' '..='~'`, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for `' '..='~'`, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

/// `true` if the built-in Helvetica faces can encode `c`.
pub fn is_standard_encodable(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{A0}'..='\u{FF}') || WIN_ANSI_EXTRAS.contains(&c)
}

/// Readable WinAnsi stand-in for a character the built-in faces lack.
pub fn standard_substitute(c: char) -> Option<&'static str> {
    Some(match c {
        '₹' => "Rs.",
        '❌' | '✖' | '✗' | '✘' => "x",
        '✅' | '✔' | '✓' => "v",
        '→' | '⟶' => "->",
        '←' => "<-",
        '≈' => "~",
        '−' | '‐' | '‑' => "-",
        '\t' => " ",
        _ => return None,
    })
}

/// Zero-width marks that only modify their neighbours.
fn is_modifier(c: char) -> bool {
    matches!(c, '\u{FE0E}' | '\u{FE0F}' | '\u{200B}'..='\u{200D}' | '\u{2060}' | '\u{FEFF}')
}

/// Rewrite `text` into the WinAnsi set.
///
/// Returns the rewritten text and every character that had to be dropped,
/// in order of appearance (duplicates included).
pub fn fit_standard_encoding(text: &str) -> (String, Vec<char>) {
    let mut out = String::with_capacity(text.len());
    let mut dropped = Vec::new();
    for c in text.chars() {
        if is_standard_encodable(c) || c == '\n' || c == '\r' {
            out.push(c);
        } else if let Some(sub) = standard_substitute(c) {
            out.push_str(sub);
        } else if !is_modifier(c) {
            dropped.push(c);
        }
    }
    (out, dropped)
}

/// Fit every card's heading and body into the WinAnsi set in place.
///
/// Returns the distinct dropped characters, in order of first appearance.
pub fn fit_sections(sections: &mut [ItinerarySection]) -> Vec<char> {
    let mut dropped: Vec<char> = Vec::new();
    for section in sections.iter_mut() {
        for field in [&mut section.heading, &mut section.body] {
            let (fitted, lost) = fit_standard_encoding(field);
            *field = fitted;
            for c in lost {
                if !dropped.contains(&c) {
                    dropped.push(c);
                }
            }
        }
    }
    dropped
}

/// Advance width of `c` in em.
///
/// ASCII uses the Helvetica metrics. Ideographs, kana, hangul and emoji
/// are full width; everything else falls back to `fallback`.
pub fn char_width_em(c: char, style: FontStyle, fallback: f32) -> f32 {
    let table = match style {
        FontStyle::Regular => &HELVETICA,
        FontStyle::Bold => &HELVETICA_BOLD,
    };
    match c {
        ' '..='~' => table[(c as usize) - 0x20] as f32 / 1000.0,
        '\u{1100}'..='\u{115F}'
        | '\u{2E80}'..='\u{A4CF}'
        | '\u{AC00}'..='\u{D7A3}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{FF00}'..='\u{FF60}'
        | '\u{1F300}'..='\u{1FAFF}'
        | '\u{20000}'..='\u{3FFFD}' => 1.0,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rupee_amounts_stay_readable() {
        let (text, dropped) = fit_standard_encoding("Hotel ₹2,500 per night");
        assert_eq!(text, "Hotel Rs.2,500 per night");
        assert!(dropped.is_empty());
    }

    #[test]
    fn connection_error_text_is_drawable() {
        let (text, dropped) = fit_standard_encoding(crate::error::CONNECTION_FAILED_MESSAGE);
        assert_eq!(text, "x Error connecting to server");
        assert!(dropped.is_empty());
    }

    #[test]
    fn latin1_and_win_ansi_pass_through() {
        let input = "Café – “Panaji” … 20 €";
        assert_eq!(fit_standard_encoding(input), (input.to_string(), vec![]));
    }

    #[test]
    fn unencodable_characters_are_reported() {
        let (text, dropped) = fit_standard_encoding("Tokyo 東京 🏖\u{FE0F} trip");
        assert_eq!(text, "Tokyo   trip");
        assert_eq!(dropped, vec!['東', '京', '🏖']);
    }

    #[test]
    fn sections_report_each_character_once() {
        let mut sections = vec![
            ItinerarySection::new("Day 1: Kyoto 京", "\nTemple ₹0"),
            ItinerarySection::new("Day 2: 京", "\n"),
        ];
        let dropped = fit_sections(&mut sections);
        assert_eq!(dropped, vec!['京']);
        assert_eq!(sections[0].heading, "Day 1: Kyoto ");
        assert_eq!(sections[0].body, "\nTemple Rs.0");
    }

    #[test]
    fn capitals_are_wider_than_average() {
        assert_eq!(char_width_em('W', FontStyle::Regular, 0.55), 0.944);
        assert_eq!(char_width_em('M', FontStyle::Bold, 0.55), 0.833);
        assert_eq!(char_width_em('i', FontStyle::Regular, 0.55), 0.222);
        assert_eq!(char_width_em('京', FontStyle::Regular, 0.55), 1.0);
        assert_eq!(char_width_em('é', FontStyle::Regular, 0.55), 0.55);
    }
}

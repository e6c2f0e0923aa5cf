//! Region layout: position itinerary cards and their text lines.
//!
//! This is the stand-in for the browser's layout of the itinerary section:
//! cards stacked vertically, each with a prominent heading line and a body
//! rendered from Markdown. All geometry is in PDF points measured from the
//! *top* of the region, the way a DOM box is measured; [`super::capture`]
//! flips it into PDF's bottom-up space when drawing.
//!
//! Text is wrapped on the standard Helvetica advance widths (see
//! [`super::fonts`]) rather than by asking pdfium, so layout stays a pure
//! function of the sections and options.

use crate::pipeline::fonts;
use crate::pipeline::markdown::{self, Block};
use crate::pipeline::segment::ItinerarySection;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Typography and spacing of the itinerary region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    /// Region width in points. Default: 595 (A4 width), so one capture
    /// point lands on one page point.
    pub width: f32,
    /// Inner padding of each card.
    pub card_padding: f32,
    /// Vertical gap between cards.
    pub card_spacing: f32,
    /// Card heading font size.
    pub heading_size: f32,
    /// Body font size; body headings scale up from it.
    pub body_size: f32,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    /// Gap between the card heading and its body.
    pub heading_gap: f32,
    /// Gap between body blocks.
    pub block_gap: f32,
    /// Indent of list item text after its bullet or number.
    pub list_indent: f32,
    /// Width, in em, assumed for characters outside the Helvetica metrics
    /// (accented and other non-ASCII letters).
    pub glyph_width: f32,
    pub background: Rgb,
    pub card_fill: Rgb,
    pub heading_colour: Rgb,
    pub text_colour: Rgb,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            width: 595.0,
            card_padding: 18.0,
            card_spacing: 18.0,
            heading_size: 15.0,
            body_size: 10.5,
            line_height: 1.4,
            heading_gap: 9.0,
            block_gap: 4.0,
            list_indent: 14.0,
            glyph_width: 0.6,
            background: Rgb(15, 23, 42),
            card_fill: Rgb(30, 41, 59),
            heading_colour: Rgb(52, 211, 153),
            text_colour: Rgb(226, 232, 240),
        }
    }
}

/// Which standard face a line is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

/// One positioned line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub x: f32,
    /// Distance from the region top to the baseline.
    pub baseline: f32,
    pub text: String,
    pub size: f32,
    pub style: FontStyle,
    pub colour: Rgb,
}

/// An axis-aligned box measured from the region top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxRect {
    pub x: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// The fully laid-out itinerary region.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub width: f32,
    pub height: f32,
    pub background: Rgb,
    pub card_fill: Rgb,
    pub text_colour: Rgb,
    pub cards: Vec<BoxRect>,
    pub rules: Vec<BoxRect>,
    pub lines: Vec<TextLine>,
}

/// Lay out one card per section, stacked top to bottom.
pub fn lay_out(sections: &[ItinerarySection], opts: &LayoutOptions) -> Region {
    let mut region = Region {
        width: opts.width,
        height: 0.0,
        background: opts.background,
        card_fill: opts.card_fill,
        text_colour: opts.text_colour,
        cards: Vec::with_capacity(sections.len()),
        rules: Vec::new(),
        lines: Vec::new(),
    };

    let inner_width = opts.width - 2.0 * opts.card_padding;
    let mut y = 0.0;

    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            y += opts.card_spacing;
        }
        let card_top = y;
        let x = opts.card_padding;
        y += opts.card_padding;

        // The heading line is always reserved, even when empty.
        let heading_lines = wrap(
            section.heading.trim_end(),
            inner_width,
            opts.heading_size,
            FontStyle::Bold,
            opts,
        );
        y = push_lines(
            &mut region.lines,
            heading_lines,
            x,
            y,
            opts.heading_size,
            FontStyle::Bold,
            opts.heading_colour,
            opts,
        );
        y += opts.heading_gap;

        for (j, block) in markdown::to_blocks(&section.body).iter().enumerate() {
            if j > 0 {
                y += opts.block_gap;
            }
            y = lay_out_block(&mut region, block, x, y, inner_width, opts);
        }

        y += opts.card_padding;
        region.cards.push(BoxRect {
            x: 0.0,
            top: card_top,
            width: opts.width,
            height: y - card_top,
        });
    }

    region.height = y;
    debug!(
        "Laid out {} cards → {:.0}x{:.0} pt, {} lines",
        region.cards.len(),
        region.width,
        region.height,
        region.lines.len()
    );
    region
}

fn lay_out_block(
    region: &mut Region,
    block: &Block,
    x: f32,
    y: f32,
    width: f32,
    opts: &LayoutOptions,
) -> f32 {
    let size = opts.body_size;
    match block {
        Block::Heading { level, text } => {
            let size = heading_size(*level, opts);
            let lines = wrap(text, width, size, FontStyle::Bold, opts);
            push_lines(&mut region.lines, lines, x, y, size, FontStyle::Bold, opts.text_colour, opts)
        }
        Block::Paragraph(text) => {
            let lines = wrap(text, width, size, FontStyle::Regular, opts);
            push_lines(&mut region.lines, lines, x, y, size, FontStyle::Regular, opts.text_colour, opts)
        }
        Block::Bullet(text) => list_item(region, "\u{2022}", text, x, y, width, opts),
        Block::Numbered { number, text } => {
            list_item(region, &format!("{number}."), text, x, y, width, opts)
        }
        Block::Rule => {
            let mid = y + size * opts.line_height / 2.0;
            region.rules.push(BoxRect {
                x,
                top: mid,
                width,
                height: 0.75,
            });
            y + size * opts.line_height
        }
    }
}

fn list_item(
    region: &mut Region,
    marker: &str,
    text: &str,
    x: f32,
    y: f32,
    width: f32,
    opts: &LayoutOptions,
) -> f32 {
    let size = opts.body_size;
    push_lines(
        &mut region.lines,
        vec![marker.to_string()],
        x,
        y,
        size,
        FontStyle::Regular,
        opts.text_colour,
        opts,
    );
    let lines = wrap(text, width - opts.list_indent, size, FontStyle::Regular, opts);
    push_lines(
        &mut region.lines,
        lines,
        x + opts.list_indent,
        y,
        size,
        FontStyle::Regular,
        opts.text_colour,
        opts,
    )
}

#[allow(clippy::too_many_arguments)]
fn push_lines(
    out: &mut Vec<TextLine>,
    lines: Vec<String>,
    x: f32,
    mut y: f32,
    size: f32,
    style: FontStyle,
    colour: Rgb,
    opts: &LayoutOptions,
) -> f32 {
    let advance = size * opts.line_height;
    for text in lines {
        // Baseline sits one font size below the line top, leaving the
        // remaining leading underneath for descenders.
        out.push(TextLine {
            x,
            baseline: y + size,
            text,
            size,
            style,
            colour,
        });
        y += advance;
    }
    y
}

fn heading_size(level: u8, opts: &LayoutOptions) -> f32 {
    match level {
        1 => opts.body_size * 1.6,
        2 => opts.body_size * 1.4,
        3 => opts.body_size * 1.2,
        _ => opts.body_size * 1.05,
    }
}

/// Width of `text` in points when drawn at `size` in `style`.
pub fn text_width(text: &str, size: f32, style: FontStyle, opts: &LayoutOptions) -> f32 {
    text.chars()
        .map(|c| fonts::char_width_em(c, style, opts.glyph_width))
        .sum::<f32>()
        * size
}

/// Greedy word wrap to `max_width` points.
///
/// Always returns at least one line (possibly empty). Words wider than a
/// whole line are broken between characters.
pub fn wrap(
    text: &str,
    max_width: f32,
    size: f32,
    style: FontStyle,
    opts: &LayoutOptions,
) -> Vec<String> {
    let char_width = |c: char| fonts::char_width_em(c, style, opts.glyph_width) * size;
    let space = char_width(' ');
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in text.split_whitespace() {
        let mut word = word.to_string();
        let mut word_width = text_width(&word, size, style, opts);

        if word_width > max_width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }
            let mut piece = String::new();
            let mut piece_width = 0.0_f32;
            for c in word.chars() {
                let w = char_width(c);
                if piece_width + w > max_width && !piece.is_empty() {
                    lines.push(std::mem::take(&mut piece));
                    piece_width = 0.0;
                }
                piece.push(c);
                piece_width += w;
            }
            word = piece;
            word_width = piece_width;
        }

        if !current.is_empty() && current_width + space + word_width > max_width {
            lines.push(std::mem::take(&mut current));
            current_width = 0.0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_width += space;
        }
        current.push_str(&word);
        current_width += word_width;
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> LayoutOptions {
        LayoutOptions::default()
    }

    #[test]
    fn wrap_respects_max_width() {
        let o = opts();
        let text = "the quick brown fox jumps over the lazy dog";
        let lines = wrap(text, 100.0, 10.0, FontStyle::Regular, &o);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 10.0, FontStyle::Regular, &o) <= 100.0, "{line:?}");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn wrap_breaks_long_words() {
        let o = opts();
        let word = "abcdefghijklmnopqrstuvwxyz";
        let lines = wrap(&format!("ab {word}"), 50.0, 10.0, FontStyle::Regular, &o);
        assert_eq!(lines[0], "ab");
        assert_eq!(lines[1..].concat(), word);
        for line in &lines {
            assert!(text_width(line, 10.0, FontStyle::Regular, &o) <= 50.0, "{line:?}");
        }
    }

    #[test]
    fn capital_headings_stay_inside_the_card() {
        let o = opts();
        let inner = o.width - 2.0 * o.card_padding;
        let heading = "DAY 1: WARM WELCOME WALK MUMBAI MARINE DRIVE WORLI MAHIM MUSEUM";
        let region = lay_out(&[ItinerarySection::new(heading, "")], &o);
        let heading_lines: Vec<&TextLine> = region
            .lines
            .iter()
            .filter(|l| l.style == FontStyle::Bold)
            .collect();
        assert!(heading_lines.len() > 1);
        for line in heading_lines {
            let right = line.x + text_width(&line.text, line.size, FontStyle::Bold, &o);
            assert!(right <= o.width - o.card_padding, "{:?} ends at {right}", line.text);
        }
    }

    #[test]
    fn measured_width_follows_helvetica() {
        let o = opts();
        assert!((text_width("WWWWWWWWWW", 10.0, FontStyle::Bold, &o) - 94.4).abs() < 1e-3);
        assert!((text_width("iiiiiiiiii", 10.0, FontStyle::Regular, &o) - 22.2).abs() < 1e-3);
    }

    #[test]
    fn wrap_empty_is_one_empty_line() {
        assert_eq!(
            wrap("", 100.0, 10.0, FontStyle::Regular, &opts()),
            vec![String::new()]
        );
    }

    #[test]
    fn cards_stack_without_overlap() {
        let sections = vec![
            ItinerarySection::new("Day 1: Goa", "\n- Beach\n- Fort"),
            ItinerarySection::new("Day 2: Panaji", "\nMarket walk."),
        ];
        let region = lay_out(&sections, &opts());
        assert_eq!(region.cards.len(), 2);
        let (a, b) = (region.cards[0], region.cards[1]);
        assert_eq!(a.top, 0.0);
        assert!(b.top >= a.top + a.height + opts().card_spacing - 0.01);
        assert!((region.height - (b.top + b.height)).abs() < 0.01);
    }

    #[test]
    fn empty_heading_still_reserves_a_line() {
        let region = lay_out(&[ItinerarySection::new("", "")], &opts());
        assert_eq!(region.lines.len(), 1);
        assert_eq!(region.lines[0].text, "");
        assert!(region.height > 2.0 * opts().card_padding);
    }

    #[test]
    fn heading_is_bold_and_coloured() {
        let region = lay_out(&[ItinerarySection::new("Day 1: Arrive", "\nRelax.")], &opts());
        let heading = &region.lines[0];
        assert_eq!(heading.style, FontStyle::Bold);
        assert_eq!(heading.colour, opts().heading_colour);
        assert_eq!(heading.size, opts().heading_size);
        let body = &region.lines[1];
        assert_eq!(body.text, "Relax.");
        assert!(body.baseline > heading.baseline);
    }

    #[test]
    fn bullets_are_indented() {
        let region = lay_out(&[ItinerarySection::new("Day 1:", "- Swim")], &opts());
        let marker = region.lines.iter().find(|l| l.text == "\u{2022}").unwrap();
        let item = region.lines.iter().find(|l| l.text == "Swim").unwrap();
        assert_eq!(item.x - marker.x, opts().list_indent);
        assert_eq!(item.baseline, marker.baseline);
    }

    #[test]
    fn no_sections_gives_empty_region() {
        let region = lay_out(&[], &opts());
        assert_eq!(region.height, 0.0);
        assert!(region.cards.is_empty());
    }

    #[test]
    fn rules_become_boxes() {
        let region = lay_out(&[ItinerarySection::new("Day 1:", "a\n\n---\n\nb")], &opts());
        assert_eq!(region.rules.len(), 1);
    }
}

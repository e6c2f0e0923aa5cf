//! Markdown collaborator: turn a card body into drawable text blocks.
//!
//! Answers from the planning service are loosely formatted Markdown:
//! headings, `-`/`*` bullets, numbered lists, `**bold**` labels such as
//! `**Morning:**`, the odd link. The region renderer only needs to know which
//! lines are headings, which are list items and which are running prose, so
//! this module reduces the body to a flat list of [`Block`]s with inline
//! markup stripped to plain text.
//!
//! The passes are deterministic `&str → String` functions applied in order:
//! normalise line endings, drop invisible Unicode, classify lines, strip
//! inline markup.

use once_cell::sync::Lazy;
use regex::Regex;

/// One drawable unit of a card body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `#`–`######` heading.
    Heading { level: u8, text: String },
    /// Consecutive prose lines, joined with single spaces.
    Paragraph(String),
    /// `-`, `*` or `+` list item.
    Bullet(String),
    /// `1.` / `1)` list item.
    Numbered { number: u32, text: String },
    /// `---`, `***` or `___` on its own line.
    Rule,
}

static RE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.*?)\s*#*\s*$").unwrap());
static RE_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[-*+]\s+(.*)$").unwrap());
static RE_NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(\d{1,9})[.)]\s+(.*)$").unwrap());
static RE_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:(?:-\s*){3,}|(?:\*\s*){3,}|(?:_\s*){3,})$").unwrap());

static RE_IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\([^)]*\)").unwrap());
static RE_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").unwrap());
static RE_STRONG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\*\*|__)(.+?)(\*\*|__)").unwrap());
static RE_EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*\s][^*]*)\*").unwrap());
static RE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").unwrap());

/// Reduce a Markdown body to drawable blocks.
pub fn to_blocks(body: &str) -> Vec<Block> {
    let text = remove_invisible_chars(&normalise_line_endings(body));
    let mut blocks = Vec::new();
    let mut paragraph: Vec<String> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
            continue;
        }

        if RE_RULE.is_match(line) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(Block::Rule);
        } else if let Some(caps) = RE_HEADING.captures(line.trim_start()) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(Block::Heading {
                level: caps[1].len() as u8,
                text: strip_inline(&caps[2]),
            });
        } else if let Some(caps) = RE_BULLET.captures(line) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(Block::Bullet(strip_inline(&caps[1])));
        } else if let Some(caps) = RE_NUMBERED.captures(line) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(Block::Numbered {
                number: caps[1].parse().unwrap_or(1),
                text: strip_inline(&caps[2]),
            });
        } else {
            paragraph.push(strip_inline(line.trim()));
        }
    }
    flush_paragraph(&mut paragraph, &mut blocks);

    blocks
}

fn flush_paragraph(lines: &mut Vec<String>, blocks: &mut Vec<Block>) {
    if !lines.is_empty() {
        blocks.push(Block::Paragraph(lines.join(" ")));
        lines.clear();
    }
}

/// Strip inline Markdown, keeping the visible text.
pub fn strip_inline(input: &str) -> String {
    let s = RE_IMAGE.replace_all(input, "$1");
    let s = RE_LINK.replace_all(&s, "$1");
    let s = RE_CODE.replace_all(&s, "$1");
    let s = RE_STRONG.replace_all(&s, "$2");
    let s = RE_EMPHASIS.replace_all(&s, "$1");
    s.into_owned()
}

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

//! Content unit model.
//!
//! Caret offsets never address raw bytes. They count *content units*:
//!
//! - `text`: one unit per character, except that an `<img ...>` tag is one
//!   atomic embedded unit and a character reference (`&amp;`, `&#160;`) is one
//!   unit standing for the character it decodes to. Other markup is literal
//!   text; inline formatting is not part of the model.
//! - `code`: one unit per character.
//! - `image`: the whole payload is a single atomic unit.
//!
//! Every byte of a block's content belongs to exactly one unit, so splitting
//! at a unit boundary and concatenating the halves reproduces the content.

use std::borrow::Cow;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::editing::{Block, BlockKind};

static TEXT_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<img\b[^>]*>|&(?:#[0-9]+|#x[0-9a-f]+|[a-z][a-z0-9]*);")
        .expect("text token pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Char,
    /// Character reference decoding to a single character
    CharRef,
    /// Atomic embedded element (image) that cannot be split
    Embed,
}

/// A single content unit and the bytes of the content it covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub kind: UnitKind,
    pub range: Range<usize>,
}

impl Unit {
    fn new(kind: UnitKind, range: Range<usize>) -> Self {
        Self { kind, range }
    }

    /// Embedded media, or a character that is not whitespace
    fn is_substantive(&self, content: &str) -> bool {
        match self.kind {
            UnitKind::Embed => true,
            UnitKind::Char => !content[self.range.clone()]
                .chars()
                .all(char::is_whitespace),
            UnitKind::CharRef => !html_escape::decode_html_entities(&content[self.range.clone()])
                .chars()
                .all(char::is_whitespace),
        }
    }
}

/// Break content into units in document order
pub fn tokenize(kind: BlockKind, content: &str) -> Vec<Unit> {
    match kind {
        BlockKind::Image => {
            if content.is_empty() {
                Vec::new()
            } else {
                vec![Unit::new(UnitKind::Embed, 0..content.len())]
            }
        }
        BlockKind::Code => chars_in(content, 0..content.len()).collect(),
        BlockKind::Text => {
            let mut units = Vec::new();
            let mut pos = 0;
            for token in TEXT_TOKEN.find_iter(content) {
                units.extend(chars_in(content, pos..token.start()));
                let text = token.as_str();
                if text.starts_with('<') {
                    units.push(Unit::new(UnitKind::Embed, token.range()));
                } else if html_escape::decode_html_entities(text).chars().count() == 1 {
                    units.push(Unit::new(UnitKind::CharRef, token.range()));
                } else {
                    // Unknown reference, keep it as the literal characters it is
                    units.extend(chars_in(content, token.range()));
                }
                pos = token.end();
            }
            units.extend(chars_in(content, pos..content.len()));
            units
        }
    }
}

fn chars_in(content: &str, range: Range<usize>) -> impl Iterator<Item = Unit> + '_ {
    let base = range.start;
    content[range].char_indices().map(move |(i, c)| {
        let start = base + i;
        Unit::new(UnitKind::Char, start..start + c.len_utf8())
    })
}

pub fn unit_len(kind: BlockKind, content: &str) -> usize {
    tokenize(kind, content).len()
}

/// Byte position of the boundary before unit `offset` (clamped to the end)
fn byte_boundary(units: &[Unit], content_len: usize, offset: usize) -> usize {
    units
        .get(offset)
        .map(|unit| unit.range.start)
        .unwrap_or(content_len)
}

/// Split content at a unit offset, clamping the offset to the content.
///
/// An atomic unit sitting exactly at the offset lands in the second half.
pub fn split_at_unit(kind: BlockKind, content: &str, offset: usize) -> (String, String) {
    let units = tokenize(kind, content);
    let at = byte_boundary(&units, content.len(), offset);
    let (head, tail) = content.split_at(at);
    (head.to_string(), tail.to_string())
}

/// Insert `text` at a unit offset.
///
/// Text inserted into a `text` block is escaped so that it reads back as the
/// same characters. Returns the new content and the unit offset just after
/// the inserted text.
pub fn insert_at_unit(kind: BlockKind, content: &str, offset: usize, text: &str) -> (String, usize) {
    let units = tokenize(kind, content);
    let at = byte_boundary(&units, content.len(), offset);
    let inserted: Cow<'_, str> = match kind {
        BlockKind::Text => html_escape::encode_text(text),
        BlockKind::Code | BlockKind::Image => Cow::Borrowed(text),
    };

    let mut updated = String::with_capacity(content.len() + inserted.len());
    updated.push_str(&content[..at]);
    updated.push_str(&inserted);
    updated.push_str(&content[at..]);

    let end = at + inserted.len();
    let caret = tokenize(kind, &updated)
        .iter()
        .take_while(|unit| unit.range.end <= end)
        .count();
    (updated, caret)
}

/// Remove the unit just before `offset`.
///
/// Returns `None` when there is nothing before the caret.
pub fn remove_unit_before(kind: BlockKind, content: &str, offset: usize) -> Option<(String, usize)> {
    let units = tokenize(kind, content);
    let offset = offset.min(units.len());
    let unit = units.get(offset.checked_sub(1)?)?;
    let mut updated = content.to_string();
    updated.replace_range(unit.range.clone(), "");
    Some((updated, offset - 1))
}

/// Content as the reader sees it: references decoded, embedded media dropped
pub fn plain_text(kind: BlockKind, content: &str) -> Cow<'_, str> {
    match kind {
        BlockKind::Code => Cow::Borrowed(content),
        BlockKind::Image => Cow::Borrowed(""),
        BlockKind::Text => {
            let units = tokenize(kind, content);
            if units.iter().all(|unit| unit.kind == UnitKind::Char) {
                return Cow::Borrowed(content);
            }
            let mut text = String::with_capacity(content.len());
            for unit in &units {
                let raw = &content[unit.range.clone()];
                match unit.kind {
                    UnitKind::Char => text.push_str(raw),
                    UnitKind::CharRef => text.push_str(&html_escape::decode_html_entities(raw)),
                    UnitKind::Embed => {}
                }
            }
            Cow::Owned(text)
        }
    }
}

/// Concatenate two pieces of content of the same kind.
///
/// A reference or `<img>` tag never forms across the seam: a literal `&` or
/// `<` at the end of `head` that would pair with the start of `tail` is
/// escaped first. The result holds the units of `head` followed by the units
/// of `tail`, and reads as the two plain texts one after the other.
pub fn join(kind: BlockKind, head: &str, tail: &str) -> String {
    let mut head = head.to_string();
    if kind != BlockKind::Text {
        head.push_str(tail);
        return head;
    }

    loop {
        let joined = format!("{head}{tail}");
        let seam = head.len();
        let crosses_seam = tokenize(kind, &joined)
            .iter()
            .any(|unit| unit.range.start < seam && unit.range.end > seam);
        if !crosses_seam {
            return joined;
        }

        let units = tokenize(kind, &head);
        let Some(opener) = units.iter().rev().find(|unit| {
            unit.kind == UnitKind::Char && matches!(&head[unit.range.clone()], "&" | "<")
        }) else {
            return joined;
        };
        let escaped = if &head[opener.range.clone()] == "&" {
            "&amp;"
        } else {
            "&lt;"
        };
        head.replace_range(opener.range.clone(), escaped);
    }
}

/// Re-express content written for one block kind as content for another.
///
/// Text becomes code with its references decoded (embedded tags stay as
/// their source); code becomes text with markup characters escaped. An image
/// payload becomes an embedded `<img>` in text.
pub fn convert(from: BlockKind, to: BlockKind, content: &str) -> String {
    match (from, to) {
        (BlockKind::Text, BlockKind::Code) => tokenize(from, content)
            .iter()
            .map(|unit| {
                let raw = &content[unit.range.clone()];
                match unit.kind {
                    UnitKind::CharRef => html_escape::decode_html_entities(raw),
                    UnitKind::Char | UnitKind::Embed => Cow::Borrowed(raw),
                }
            })
            .collect(),
        (BlockKind::Code, BlockKind::Text) => html_escape::encode_text(content).into_owned(),
        (BlockKind::Image, BlockKind::Text) if !content.is_empty() => format!(
            "<img src=\"{}\">",
            html_escape::encode_double_quoted_attribute(content)
        ),
        _ => content.to_string(),
    }
}

/// A block is empty iff its trimmed text is empty and it embeds no media
pub fn is_block_empty(block: &Block) -> bool {
    let units = tokenize(block.kind, &block.content);
    !units.iter().any(|unit| unit.is_substantive(&block.content))
}

/// True iff no non-whitespace unit and no atomic unit precedes the caret
pub fn is_caret_at_start(block: &Block, caret_offset: usize) -> bool {
    tokenize(block.kind, &block.content)
        .iter()
        .take(caret_offset)
        .all(|unit| !unit.is_substantive(&block.content))
}

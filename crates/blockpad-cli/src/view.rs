//! Turning blocks into terminal lines and caret offsets into screen cells.

use blockpad_engine::editing::content::{UnitKind, plain_text, tokenize};
use blockpad_engine::{Block, BlockKind};

/// Glyph standing in for an embedded image inside text
const EMBED_GLYPH: char = '▣';

/// One display string per content unit of the block
fn display_units(block: &Block) -> Vec<String> {
    if block.kind == BlockKind::Image {
        if block.content.is_empty() {
            return Vec::new();
        }
        return vec![format!("{EMBED_GLYPH} image ({} bytes)", block.content.len())];
    }

    tokenize(block.kind, &block.content)
        .into_iter()
        .map(|unit| {
            let raw = &block.content[unit.range];
            match unit.kind {
                UnitKind::Char => raw.to_string(),
                UnitKind::CharRef => plain_text(BlockKind::Text, raw).into_owned(),
                UnitKind::Embed => EMBED_GLYPH.to_string(),
            }
        })
        .collect()
}

/// Lines of text the block occupies on screen (at least one)
pub fn display_lines(block: &Block) -> Vec<String> {
    let text: String = display_units(block).concat();
    text.split('\n').map(str::to_string).collect()
}

/// Line and column of the caret within the block's display lines
pub fn caret_cell(block: &Block, caret: usize) -> (usize, usize) {
    let mut line = 0;
    let mut column = 0;
    for unit in display_units(block).iter().take(caret) {
        for c in unit.chars() {
            if c == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
    }
    (line, column)
}

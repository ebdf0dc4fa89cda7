//! Placement of the floating formatting toolbar.
//!
//! Formatting itself is applied by the view to the rendered surface; the model
//! only helps decide which toolbar to show and where.

use crate::editing::{BlockDocument, BlockId, BlockKind};

/// Screen rectangle in view coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolbarDimensions {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for ToolbarDimensions {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 40.0,
            padding: 16.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub top: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarKind {
    Text,
    Image,
    Code,
}

impl From<BlockKind> for ToolbarKind {
    fn from(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Text => ToolbarKind::Text,
            BlockKind::Image => ToolbarKind::Image,
            BlockKind::Code => ToolbarKind::Code,
        }
    }
}

/// Reported by the view when the user selects something inside a block
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionHint {
    pub block_id: BlockId,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolbarPlacement {
    pub kind: ToolbarKind,
    pub block_id: BlockId,
    pub position: Position,
}

/// Position a toolbar for a selection.
///
/// Centred horizontally over the selection and kept `padding` away from both
/// viewport edges. Placed above the selection unless that would come within
/// `padding` of the top, in which case it goes below.
pub fn place_toolbar(selection: &Rect, viewport: &Viewport, dims: &ToolbarDimensions) -> Position {
    let centred = selection.left + selection.width / 2.0 - dims.width / 2.0;
    let right_edge = viewport.width - dims.width - dims.padding;
    let left = dims.padding.max(centred.min(right_edge));

    let above = selection.top - dims.height - dims.padding;
    let top = if above < dims.padding {
        selection.bottom() + dims.padding
    } else {
        above
    };

    Position { top, left }
}

impl BlockDocument {
    /// Toolbar for the block a selection belongs to.
    ///
    /// Returns `None` if the block no longer exists.
    pub fn toolbar_for(
        &self,
        hint: &SelectionHint,
        viewport: &Viewport,
        dims: &ToolbarDimensions,
    ) -> Option<ToolbarPlacement> {
        let block = self.block(self.index_of(&hint.block_id)?)?;
        Some(ToolbarPlacement {
            kind: block.kind.into(),
            block_id: block.id.clone(),
            position: place_toolbar(&hint.rect, viewport, dims),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::BlockRecord;

    const VIEWPORT: Viewport = Viewport {
        width: 1000.0,
        height: 800.0,
    };

    fn rect(top: f64, left: f64, width: f64) -> Rect {
        Rect {
            top,
            left,
            width,
            height: 20.0,
        }
    }

    #[test]
    fn test_centred_above_selection() {
        let position = place_toolbar(&rect(300.0, 400.0, 100.0), &VIEWPORT, &ToolbarDimensions::default());
        assert_eq!(position, Position { top: 244.0, left: 350.0 });
    }

    #[test]
    fn test_clamped_to_left_padding() {
        let position = place_toolbar(&rect(300.0, 0.0, 10.0), &VIEWPORT, &ToolbarDimensions::default());
        assert_eq!(position.left, 16.0);
    }

    #[test]
    fn test_clamped_to_right_edge() {
        let position = place_toolbar(&rect(300.0, 980.0, 10.0), &VIEWPORT, &ToolbarDimensions::default());
        assert_eq!(position.left, 1000.0 - 200.0 - 16.0);
    }

    #[test]
    fn test_flips_below_near_top() {
        let position = place_toolbar(&rect(30.0, 400.0, 100.0), &VIEWPORT, &ToolbarDimensions::default());
        assert_eq!(position.top, 30.0 + 20.0 + 16.0);
    }

    #[test]
    fn test_toolbar_kind_follows_block() {
        let doc = BlockDocument::from_records(&[
            BlockRecord::text("t", "words"),
            BlockRecord::new(Some("i"), BlockKind::Image, "data:x"),
        ]);
        let hint = SelectionHint {
            block_id: BlockId::from("i"),
            rect: rect(300.0, 400.0, 100.0),
        };
        let placement = doc
            .toolbar_for(&hint, &VIEWPORT, &ToolbarDimensions::default())
            .unwrap();
        assert_eq!(placement.kind, ToolbarKind::Image);
        assert_eq!(placement.block_id, BlockId::from("i"));

        let gone = SelectionHint {
            block_id: BlockId::from("missing"),
            ..hint
        };
        assert_eq!(doc.toolbar_for(&gone, &VIEWPORT, &ToolbarDimensions::default()), None);
    }
}

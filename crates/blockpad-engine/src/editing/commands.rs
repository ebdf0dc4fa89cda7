use crate::editing::{BlockDocument, BlockKind, CaretRequest, Patch};

/// Commands that can be applied to the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    CreateBlock {
        after: usize,
        kind: BlockKind,
        content: String,
    },
    InsertBlock {
        at: usize,
        kind: BlockKind,
        content: String,
    },
    SplitBlock {
        index: usize,
        offset: usize,
    },
    MergeWithPrevious {
        index: usize,
    },
    RemoveBlock {
        index: usize,
    },
    UpdateBlock {
        index: usize,
        content: String,
    },
    SetBlockType {
        index: usize,
        kind: BlockKind,
    },
    ConvertBlock {
        index: usize,
        kind: BlockKind,
    },
    InsertText {
        index: usize,
        offset: usize,
        text: String,
    },
    DeleteBackward {
        index: usize,
        offset: usize,
    },
}

impl BlockDocument {
    /// Apply a command and describe its effect.
    ///
    /// New blocks are focused at their end. `changed` is false when the
    /// command turned out to be a no-op (invalid index, unchanged content, ...).
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let version_before = self.version();
        let caret = match cmd {
            Cmd::CreateBlock {
                after,
                kind,
                content,
            } => Some(CaretRequest::end_of(self.create_block(after, content, kind))),
            Cmd::InsertBlock { at, kind, content } => {
                Some(CaretRequest::end_of(self.insert_block(at, content, kind)))
            }
            Cmd::SplitBlock { index, offset } => self.split_block(index, offset),
            Cmd::MergeWithPrevious { index } => self.merge_with_previous(index),
            Cmd::RemoveBlock { index } => self.remove_block(index),
            Cmd::UpdateBlock { index, content } => {
                self.update_block(index, content);
                None
            }
            Cmd::SetBlockType { index, kind } => {
                self.set_block_type(index, kind);
                None
            }
            Cmd::ConvertBlock { index, kind } => {
                self.convert_block(index, kind);
                None
            }
            Cmd::InsertText {
                index,
                offset,
                text,
            } => self.insert_text(index, offset, &text),
            Cmd::DeleteBackward { index, offset } => self.delete_backward(index, offset),
        };

        Patch {
            changed: self.version() != version_before,
            caret,
            version: self.version(),
        }
    }
}

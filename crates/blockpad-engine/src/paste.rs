//! Routing of clipboard payloads into the document.

use crate::editing::{BlockDocument, BlockKind, CaretRequest};

/// Markers whose presence suggests pasted text is source code
const CODE_MARKERS: &[&str] = &[
    "{", "}", ";", "//", "/*", "*/", "function", "const", "let", "var", "class", "import",
    "export", "</", "/>",
];

/// Best-effort guess whether pasted text is code.
///
/// True iff the text contains one of the code markers and spans more than
/// one line. This is a heuristic, not a parser.
pub fn is_code_content(text: &str) -> bool {
    text.contains('\n') && CODE_MARKERS.iter().any(|marker| text.contains(marker))
}

/// What the view found on the clipboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PastePayload {
    Text(String),
    /// Image already read into a data URI
    Image(String),
}

impl BlockDocument {
    /// Paste into block `index` with the caret at `caret_offset`.
    ///
    /// - code-looking text becomes a new code block after the current one,
    ///   unless the current block already is code
    /// - other text is inserted at the caret
    /// - an image becomes a new image block after the current one
    ///
    /// Returns where the caret should go afterwards.
    pub fn paste(
        &mut self,
        index: usize,
        caret_offset: usize,
        payload: PastePayload,
    ) -> Option<CaretRequest> {
        let kind = self.block(index)?.kind;
        match payload {
            PastePayload::Image(data_uri) => {
                let new_index = self.create_block(index, data_uri, BlockKind::Image);
                Some(CaretRequest::end_of(new_index))
            }
            PastePayload::Text(text) if text.is_empty() => None,
            PastePayload::Text(text) => match kind {
                BlockKind::Code => self.insert_text(index, caret_offset, &text),
                BlockKind::Text if is_code_content(&text) => {
                    log::debug!("Pasted text classified as code");
                    let new_index = self.create_block(index, text, BlockKind::Code);
                    Some(CaretRequest::end_of(new_index))
                }
                BlockKind::Text => self.insert_text(index, caret_offset, &text),
                BlockKind::Image => {
                    let new_index = self.create_block(index, "", BlockKind::Text);
                    self.insert_text(new_index, 0, &text)
                }
            },
        }
    }
}

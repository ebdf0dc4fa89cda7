use crate::editing::CaretRequest;

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Whether the document was mutated
    pub changed: bool,
    /// Where focus should go next, if anywhere
    pub caret: Option<CaretRequest>,
    pub version: u64,
}

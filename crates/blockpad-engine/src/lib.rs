pub mod editing;
pub mod io;
pub mod paste;
pub mod toolbar;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::*;
pub use io::{IoError, read_document, write_document};
pub use paste::{PastePayload, is_code_content};
pub use toolbar::{
    Position, Rect, SelectionHint, ToolbarDimensions, ToolbarKind, ToolbarPlacement, Viewport,
    place_toolbar,
};

use crate::editing::{BlockDocument, CaretRequest, Cmd};

/// Key name as reported by the view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Other(String),
}

impl Key {
    /// Map a platform key name ("Enter", "Backspace", ...) to a key
    pub fn from_name(name: &str) -> Self {
        match name {
            "Enter" => Key::Enter,
            "Backspace" => Key::Backspace,
            other => Key::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }
}

impl From<Key> for KeyInput {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}

/// What a keydown resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Split,
    Merge,
    Remove,
    /// Leave the key to native text editing
    PassThrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyOutcome {
    pub action: KeyAction,
    pub caret: Option<CaretRequest>,
}

impl KeyOutcome {
    fn pass_through() -> Self {
        Self {
            action: KeyAction::PassThrough,
            caret: None,
        }
    }

    /// Whether the view must suppress its own handling of the key
    pub fn prevent_default(&self) -> bool {
        self.action != KeyAction::PassThrough
    }
}

/// Decide what a keydown in block `index` with the caret at `caret_offset` does.
///
/// | key              | condition                        | action       |
/// |------------------|----------------------------------|--------------|
/// | Enter (no Shift) | any                              | split        |
/// | Backspace        | empty block, not first           | remove       |
/// | Backspace        | caret at start, not first        | merge        |
/// | Backspace        | empty and only block             | remove (clears in place) |
/// | anything else    |                                  | pass through |
pub fn resolve_key(
    doc: &BlockDocument,
    index: usize,
    caret_offset: usize,
    input: &KeyInput,
) -> KeyAction {
    let Some(block) = doc.block(index) else {
        return KeyAction::PassThrough;
    };

    match input.key {
        Key::Enter if !input.modifiers.shift => KeyAction::Split,
        Key::Backspace => {
            let is_empty = block.is_empty();
            if is_empty && index > 0 {
                KeyAction::Remove
            } else if index > 0 && block.is_caret_at_start(caret_offset) {
                KeyAction::Merge
            } else if is_empty && doc.len() == 1 {
                KeyAction::Remove
            } else {
                KeyAction::PassThrough
            }
        }
        _ => KeyAction::PassThrough,
    }
}

impl BlockDocument {
    /// Resolve and apply a keydown
    pub fn handle_key(&mut self, index: usize, caret_offset: usize, input: &KeyInput) -> KeyOutcome {
        let action = resolve_key(self, index, caret_offset, input);
        let cmd = match action {
            KeyAction::Split => Cmd::SplitBlock {
                index,
                offset: caret_offset,
            },
            KeyAction::Merge => Cmd::MergeWithPrevious { index },
            KeyAction::Remove => Cmd::RemoveBlock { index },
            KeyAction::PassThrough => return KeyOutcome::pass_through(),
        };

        let patch = self.apply(cmd);
        KeyOutcome {
            action,
            caret: patch.caret,
        }
    }
}

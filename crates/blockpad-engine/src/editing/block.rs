use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::editing::content;

/// Variant tag of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// HTML/plain text
    #[default]
    Text,
    /// Data URI or reference to an image
    Image,
    /// Raw source text
    Code,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::Image => "image",
            BlockKind::Code => "code",
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identifier of a block, unique within its document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this id carries no usable value (empty or whitespace only)
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for BlockId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One discrete unit of document content.
///
/// The block's position in its document is its order; there is no order field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub content: String,
}

impl Block {
    /// Create a block with a freshly generated id
    pub fn new(kind: BlockKind, content: impl Into<String>) -> Self {
        Self::with_id(BlockId::generate(), kind, content)
    }

    pub fn with_id(id: BlockId, kind: BlockKind, content: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            content: content.into(),
        }
    }

    /// Number of content units (the granularity caret offsets are measured in)
    pub fn unit_len(&self) -> usize {
        content::unit_len(self.kind, &self.content)
    }

    /// No visible text and no embedded media
    pub fn is_empty(&self) -> bool {
        content::is_block_empty(self)
    }

    /// Nothing but whitespace precedes `caret_offset`
    pub fn is_caret_at_start(&self, caret_offset: usize) -> bool {
        content::is_caret_at_start(self, caret_offset)
    }

    /// Content with markup decoded and embedded media dropped
    pub fn plain_text(&self) -> std::borrow::Cow<'_, str> {
        content::plain_text(self.kind, &self.content)
    }

    pub(crate) fn to_record(&self) -> BlockRecord {
        BlockRecord {
            id: Some(self.id.as_str().to_string()),
            kind: self.kind,
            content: self.content.clone(),
        }
    }
}

/// Serialized shape of a block as exchanged with persistence.
///
/// `id` is optional on input so that hand-written or legacy data can be
/// loaded; the document fills in missing ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: BlockKind,
    #[serde(default)]
    pub content: String,
}

impl BlockRecord {
    pub fn new(id: Option<&str>, kind: BlockKind, content: impl Into<String>) -> Self {
        Self {
            id: id.map(str::to_string),
            kind,
            content: content.into(),
        }
    }

    /// A text record with the given id
    pub fn text(id: &str, content: impl Into<String>) -> Self {
        Self::new(Some(id), BlockKind::Text, content)
    }
}

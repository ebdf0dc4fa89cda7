use std::collections::HashSet;

use crate::editing::{
    Block, BlockId, BlockKind, BlockRecord, CaretRequest, Observer, Snapshot, SubscriptionId,
    content,
};

/// Ordered sequence of blocks edited by a single session.
///
/// The document is the only owner of its blocks. It guarantees that:
///
/// - the sequence is never empty; removing the last block clears it instead
/// - block ids are pairwise distinct
/// - every index passed in is validated, an out-of-range index is a no-op
///
/// Mutations that focus a different block or move the caret return a
/// [`CaretRequest`]; applying it to the rendered surface is up to the caller
/// (see [`crate::editing::PendingFocus`]).
///
/// ```rust
/// use blockpad_engine::editing::{BlockDocument, BlockRecord, CaretRequest};
///
/// let mut doc = BlockDocument::from_records(&[BlockRecord::text("a", "hello")]);
/// let caret = doc.split_block(0, 2);
///
/// assert_eq!(caret, Some(CaretRequest::at(1, 0)));
/// assert_eq!(doc.block(0).unwrap().content, "he");
/// assert_eq!(doc.block(1).unwrap().content, "llo");
/// ```
pub struct BlockDocument {
    blocks: Vec<Block>,
    /// Incremented on every effective mutation
    version: u64,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl Default for BlockDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BlockDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockDocument")
            .field("blocks", &self.blocks)
            .field("version", &self.version)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl BlockDocument {
    /// A document holding a single empty text block
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::new(BlockKind::Text, "")],
            version: 0,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Hydrate a document from persisted records (see [`BlockDocument::load`])
    pub fn from_records(records: &[BlockRecord]) -> Self {
        Self {
            blocks: blocks_from_records(records),
            ..Self::new()
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false, a document holds at least one block
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn index_of(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| &block.id == id)
    }

    /// Content units in the block at `index`
    pub fn unit_len(&self, index: usize) -> Option<usize> {
        self.blocks.get(index).map(Block::unit_len)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Insert a new block immediately after `at_index`.
    ///
    /// `at_index` is clamped to the last block. Returns the new block's index.
    pub fn create_block(
        &mut self,
        at_index: usize,
        content: impl Into<String>,
        kind: BlockKind,
    ) -> usize {
        let index = at_index.min(self.blocks.len() - 1) + 1;
        self.insert_block(index, content, kind)
    }

    /// Insert a new block at `index`, shifting later blocks down.
    ///
    /// `index` is clamped to the document length. Returns the new block's index.
    pub fn insert_block(&mut self, index: usize, content: impl Into<String>, kind: BlockKind) -> usize {
        let index = index.min(self.blocks.len());
        let block = Block::with_id(self.fresh_id(), kind, content);
        log::debug!("Inserting {} block {} at {index}", block.kind, block.id);
        self.blocks.insert(index, block);
        self.touch();
        index
    }

    /// Append a new block at the end of the document
    pub fn append_block(&mut self, content: impl Into<String>, kind: BlockKind) -> usize {
        self.insert_block(self.blocks.len(), content, kind)
    }

    /// Split the block at `index` in two at `caret_offset`.
    ///
    /// Units before the caret stay; the rest move to a new block of the same
    /// type right after it. The offset is clamped to the content. An image is
    /// never divided: splitting one inserts an empty text block after it.
    ///
    /// Returns a request for the start of the new block.
    pub fn split_block(&mut self, index: usize, caret_offset: usize) -> Option<CaretRequest> {
        if index >= self.blocks.len() {
            return None;
        }
        let id = self.fresh_id();
        let block = &mut self.blocks[index];

        let new_block = if block.kind == BlockKind::Image {
            Block::with_id(id, BlockKind::Text, "")
        } else {
            let (head, tail) = content::split_at_unit(block.kind, &block.content, caret_offset);
            block.content = head;
            Block::with_id(id, block.kind, tail)
        };

        log::debug!("Split block {} at unit {caret_offset}", block.id);
        self.blocks.insert(index + 1, new_block);
        self.touch();
        Some(CaretRequest::at(index + 1, 0))
    }

    /// Append block `index` onto its predecessor and remove it.
    ///
    /// The previous block keeps its type; the removed block's content is
    /// converted to that type first (see [`content::convert`]) and joined so
    /// that no unit forms across the seam. An image cannot hold anything
    /// after its payload, so merging content onto one turns it into a text
    /// block embedding the image.
    ///
    /// The returned caret sits at the seam: the previous block's unit length
    /// before the merge.
    pub fn merge_with_previous(&mut self, index: usize) -> Option<CaretRequest> {
        if index == 0 || index >= self.blocks.len() {
            return None;
        }

        let removed = self.blocks.remove(index);
        let target = &mut self.blocks[index - 1];
        let seam = target.unit_len();

        if !removed.content.is_empty() {
            if target.kind == BlockKind::Image {
                target.content = content::convert(BlockKind::Image, BlockKind::Text, &target.content);
                target.kind = BlockKind::Text;
            }
            let tail = content::convert(removed.kind, target.kind, &removed.content);
            target.content = content::join(target.kind, &target.content, &tail);
        }

        log::debug!(
            "Merged {} block {} into {} block {}",
            removed.kind,
            removed.id,
            target.kind,
            target.id
        );
        self.touch();
        Some(CaretRequest::at(index - 1, seam))
    }

    /// Remove the block at `index`.
    ///
    /// Removing the only block clears it (back to an empty text block with the
    /// same id) and returns `None`, focus stays where it is. Otherwise focus
    /// moves to the end of the preceding block, or of the new first block when
    /// the first block was removed.
    pub fn remove_block(&mut self, index: usize) -> Option<CaretRequest> {
        if index >= self.blocks.len() {
            return None;
        }

        if self.blocks.len() == 1 {
            let block = &mut self.blocks[0];
            if block.content.is_empty() && block.kind == BlockKind::Text {
                return None;
            }
            log::debug!("Clearing last remaining block {}", block.id);
            block.content.clear();
            block.kind = BlockKind::Text;
            self.touch();
            return None;
        }

        let removed = self.blocks.remove(index);
        log::debug!("Removed block {} at {index}", removed.id);
        let target = index.saturating_sub(1);
        let offset = self.blocks[target].unit_len();
        self.touch();
        Some(CaretRequest::at(target, offset))
    }

    /// Replace a block's content, as reported by the view after typing.
    ///
    /// Returns false if the index is out of range or nothing changed.
    pub fn update_block(&mut self, index: usize, content: impl Into<String>) -> bool {
        let Some(block) = self.blocks.get_mut(index) else {
            return false;
        };
        let content = content.into();
        if block.content == content {
            return false;
        }
        block.content = content;
        self.touch();
        true
    }

    /// Change a block's type, keeping its id and content
    pub fn set_block_type(&mut self, index: usize, kind: BlockKind) -> bool {
        let Some(block) = self.blocks.get_mut(index) else {
            return false;
        };
        if block.kind == kind {
            return false;
        }
        log::debug!("Block {} changed from {} to {kind}", block.id, block.kind);
        block.kind = kind;
        self.touch();
        true
    }

    /// Change a block's type and re-express its content for the new type.
    ///
    /// Unlike [`BlockDocument::set_block_type`] the block reads the same
    /// afterwards: `&lt;` in text becomes `<` in code and back.
    pub fn convert_block(&mut self, index: usize, kind: BlockKind) -> bool {
        let Some(block) = self.blocks.get_mut(index) else {
            return false;
        };
        if block.kind == kind {
            return false;
        }
        log::debug!("Converting block {} from {} to {kind}", block.id, block.kind);
        block.content = content::convert(block.kind, kind, &block.content);
        block.kind = kind;
        self.touch();
        true
    }

    /// Insert `text` at a unit offset in the block at `index`.
    ///
    /// Returns the caret just after the inserted text. Image blocks take no
    /// text input.
    pub fn insert_text(&mut self, index: usize, offset: usize, text: &str) -> Option<CaretRequest> {
        let block = self.blocks.get_mut(index)?;
        if block.kind == BlockKind::Image {
            return None;
        }
        if text.is_empty() {
            return Some(CaretRequest::at(index, offset.min(block.unit_len())));
        }
        let (updated, caret) = content::insert_at_unit(block.kind, &block.content, offset, text);
        block.content = updated;
        self.touch();
        Some(CaretRequest::at(index, caret))
    }

    /// Delete the unit before the caret within a block.
    ///
    /// This is plain Backspace for views without native text editing; it
    /// never crosses block boundaries.
    pub fn delete_backward(&mut self, index: usize, offset: usize) -> Option<CaretRequest> {
        let block = self.blocks.get_mut(index)?;
        let (updated, caret) = content::remove_unit_before(block.kind, &block.content, offset)?;
        block.content = updated;
        self.touch();
        Some(CaretRequest::at(index, caret))
    }

    /// Ordered `{id, type, content}` records for persistence
    pub fn serialize(&self) -> Vec<BlockRecord> {
        self.blocks.iter().map(Block::to_record).collect()
    }

    /// Replace the whole sequence with `records`.
    ///
    /// Missing, blank or duplicated ids are replaced with fresh ones and an
    /// empty input yields a single empty text block. The records themselves
    /// are left untouched.
    pub fn load(&mut self, records: &[BlockRecord]) {
        self.blocks = blocks_from_records(records);
        log::debug!("Loaded {} blocks", self.blocks.len());
        self.touch();
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: self.version,
            blocks: self.blocks.clone(),
        }
    }

    /// Call `observer` with a fresh snapshot after every effective mutation
    pub fn subscribe(&mut self, observer: impl FnMut(&Snapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    fn fresh_id(&self) -> BlockId {
        loop {
            let id = BlockId::generate();
            if self.index_of(&id).is_none() {
                return id;
            }
        }
    }

    fn touch(&mut self) {
        self.version += 1;
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, observer) in &mut self.observers {
            observer(&snapshot);
        }
    }
}

fn blocks_from_records(records: &[BlockRecord]) -> Vec<Block> {
    let mut seen: HashSet<BlockId> = HashSet::with_capacity(records.len());
    let mut blocks = Vec::with_capacity(records.len().max(1));

    for record in records {
        let id = match record.id.as_deref().map(BlockId::from) {
            Some(id) if !id.is_blank() && !seen.contains(&id) => id,
            Some(id) if !id.is_blank() => {
                log::warn!("Duplicate block id {id} replaced with a fresh id");
                unique_id(&seen)
            }
            _ => unique_id(&seen),
        };
        seen.insert(id.clone());
        blocks.push(Block::with_id(id, record.kind, record.content.clone()));
    }

    if blocks.is_empty() {
        blocks.push(Block::new(BlockKind::Text, ""));
    }
    blocks
}

fn unique_id(seen: &HashSet<BlockId>) -> BlockId {
    loop {
        let id = BlockId::generate();
        if !seen.contains(&id) {
            return id;
        }
    }
}

use crate::editing::Block;

/// Immutable view of a document at one version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub version: u64,
    pub blocks: Vec<Block>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Handle returned by `BlockDocument::subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// Callback invoked with the new snapshot after every effective mutation
pub type Observer = Box<dyn FnMut(&Snapshot)>;

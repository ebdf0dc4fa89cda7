/// Which block should receive focus after a mutation, and where the caret goes.
///
/// `offset` is measured in content units; `None` means "end of content".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaretRequest {
    pub block_index: usize,
    pub offset: Option<usize>,
}

impl CaretRequest {
    pub fn at(block_index: usize, offset: usize) -> Self {
        Self {
            block_index,
            offset: Some(offset),
        }
    }

    pub fn end_of(block_index: usize) -> Self {
        Self {
            block_index,
            offset: None,
        }
    }

    /// Concrete caret offset for a block currently holding `unit_len` units.
    ///
    /// Offsets past the end are clamped since the content may have changed
    /// between the request and its fulfilment.
    pub fn resolve_offset(&self, unit_len: usize) -> usize {
        self.offset.map_or(unit_len, |offset| offset.min(unit_len))
    }
}

/// Single-slot queue for a caret request the view could not apply yet.
///
/// A view can only move focus once it has rendered a surface for the target
/// block. Requests wait here until then; a newer request replaces an older
/// unfulfilled one.
#[derive(Debug, Default, Clone)]
pub struct PendingFocus {
    pending: Option<CaretRequest>,
}

impl PendingFocus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a request, replacing whatever was waiting
    pub fn request(&mut self, request: CaretRequest) {
        if let Some(previous) = self.pending.replace(request) {
            log::debug!("Caret request {previous:?} superseded by {request:?}");
        }
    }

    pub fn pending(&self) -> Option<CaretRequest> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Hand over the pending request once its block has been rendered.
    ///
    /// Returns `None` and keeps the request queued while
    /// `block_index >= rendered_blocks`.
    pub fn take_ready(&mut self, rendered_blocks: usize) -> Option<CaretRequest> {
        match self.pending {
            Some(request) if request.block_index < rendered_blocks => self.pending.take(),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

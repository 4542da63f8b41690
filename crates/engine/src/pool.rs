use std::collections::VecDeque;

use crate::error::SyncError;
use crate::store::IdAllocator;

/// Default number of identifiers requested per allocator call.
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// FIFO buffer of pre-allocated entity identifiers.
///
/// Ids are fetched in batches and handed out in allocator order. A
/// failed refill propagates as [`SyncError::Allocation`]; ids popped
/// from an earlier successful batch stay usable across later failures.
pub struct IdPool<'a> {
    allocator: &'a dyn IdAllocator,
    buffer: VecDeque<String>,
    batch_size: usize,
}

impl<'a> IdPool<'a> {
    pub fn new(allocator: &'a dyn IdAllocator) -> Self {
        Self::with_batch_size(allocator, DEFAULT_BATCH_SIZE)
    }

    pub fn with_batch_size(allocator: &'a dyn IdAllocator, batch_size: usize) -> Self {
        Self {
            allocator,
            buffer: VecDeque::new(),
            batch_size,
        }
    }

    /// Pop the next identifier, refilling one batch if the buffer is
    /// empty.
    pub fn next_id(&mut self) -> Result<String, SyncError> {
        if self.buffer.is_empty() {
            let batch = self.allocator.allocate(self.batch_size)?;
            self.buffer.extend(batch);
        }
        self.buffer
            .pop_front()
            .ok_or_else(|| SyncError::Parse("allocator returned an empty id batch".into()))
    }
}

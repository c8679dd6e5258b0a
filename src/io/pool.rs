use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::{BenchError, Result};

/// Memory pool handed to the reading path for its large buffers.
///
/// Buffers come from mimalloc, the process-wide allocator. The pool only
/// tracks how much it handed out; clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct MemoryPool {
    bytes_allocated: Arc<AtomicU64>,
}

impl MemoryPool {
    /// Create a new, empty memory pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an empty buffer with room for exactly `len` bytes.
    ///
    /// Nothing is written to the buffer, so the caller pays only for the
    /// bytes it reads into it. A size the address space cannot hold fails
    /// with an allocation error instead of aborting the process.
    pub fn allocate(&self, len: u64) -> Result<Vec<u8>> {
        let capacity = usize::try_from(len).map_err(|_| {
            BenchError::AllocationError(format!("{} bytes exceed the address space", len))
        })?;

        let mut buffer = Vec::new();
        buffer.try_reserve_exact(capacity)?;

        self.bytes_allocated.fetch_add(len, Ordering::Relaxed);
        Ok(buffer)
    }

    /// Total bytes handed out by this pool
    pub fn bytes_allocated(&self) -> u64 {
        self.bytes_allocated.load(Ordering::Relaxed)
    }
}

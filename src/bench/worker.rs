//! Worker thread pool for parallel column decoding
//!
//! The pool is owned by the benchmark runner and passed explicitly into
//! every iteration, so its capacity is configuration rather than process
//! global state.

use crate::Result;

/// Fixed-capacity pool of decode worker threads
#[derive(Debug)]
pub struct WorkerPool {
    pool: rayon::ThreadPool,
}

impl WorkerPool {
    /// Create a pool with exactly `capacity` worker threads
    pub fn new(capacity: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(capacity)
            .thread_name(|index| format!("decode-worker-{}", index))
            .build()?;

        log::debug!("worker pool ready with {} thread(s)", pool.current_num_threads());
        Ok(Self { pool })
    }

    /// Number of worker threads, read back from the pool itself
    pub fn capacity(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `op` inside the pool; parallel iterators in `op` use its workers
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}

//! I/O module
//!
//! Random-access file input and the memory pool the reading path
//! allocates its buffers from.

pub mod pool;
pub mod source;

pub use pool::MemoryPool;
pub use source::{open_random_access, RandomAccessFile};

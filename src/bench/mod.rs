//! Benchmark engine module
//!
//! Contains the per-iteration file operations, the worker pool they decode
//! on, and the sequential run loop.

pub mod ipc;
pub mod parquet_file;
pub mod runner;
pub mod worker;

// Re-export commonly used types
pub use ipc::{convert_parquet_to_ipc, process_ipc_file, write_ipc_file};
pub use parquet_file::{process_parquet_file, ParquetReader};
pub use runner::{run_ipc_blocking, run_parquet_blocking, BenchmarkRunner};
pub use worker::WorkerPool;

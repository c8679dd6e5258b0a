//! parquet-bench - Parquet read micro-benchmark
//!
//! Times how long it takes to open a Parquet file and materialize it into
//! an Arrow table, averaged over repeated iterations.

use std::fmt;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

pub mod bench;
pub mod config;
pub mod io;
pub mod models;
pub mod util;

// Every allocation of the process, the reader's pre-buffer included, is
// served by mimalloc.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// Common error types
#[derive(Debug)]
pub enum BenchError {
    /// Wrong command line usage; carries the usage line
    Usage(String),
    /// I/O operation failed
    IoError(std::io::Error),
    /// Parquet decoding or metadata error
    ParquetError(ParquetError),
    /// Arrow table construction or IPC error
    ArrowError(ArrowError),
    /// Memory pool could not satisfy an allocation
    AllocationError(String),
    /// Worker thread pool could not be created
    ThreadPoolError(String),
    /// Configuration validation or parsing error
    ConfigError(String),
    /// Benchmark execution error
    BenchmarkError(String),
}

impl fmt::Display for BenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchError::Usage(usage) => write!(f, "{}", usage),
            BenchError::IoError(err) => write!(f, "IOError: {}", err),
            BenchError::ParquetError(err) => write!(f, "{}", err),
            BenchError::ArrowError(err) => write!(f, "Arrow error: {}", err),
            BenchError::AllocationError(msg) => write!(f, "Out of memory: {}", msg),
            BenchError::ThreadPoolError(msg) => write!(f, "Thread pool error: {}", msg),
            BenchError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            BenchError::BenchmarkError(msg) => write!(f, "Benchmark error: {}", msg),
        }
    }
}

impl std::error::Error for BenchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BenchError::IoError(err) => Some(err),
            BenchError::ParquetError(err) => Some(err),
            BenchError::ArrowError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BenchError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::OutOfMemory => {
                BenchError::AllocationError(format!("{}", err))
            }
            _ => BenchError::IoError(err),
        }
    }
}

impl From<ParquetError> for BenchError {
    fn from(err: ParquetError) -> Self {
        match err {
            ParquetError::External(inner) => match inner.downcast::<std::io::Error>() {
                Ok(io_err) => BenchError::from(*io_err),
                Err(inner) => BenchError::ParquetError(ParquetError::External(inner)),
            },
            other => BenchError::ParquetError(other),
        }
    }
}

impl From<ArrowError> for BenchError {
    fn from(err: ArrowError) -> Self {
        match err {
            ArrowError::IoError(msg, io_err) => {
                log::debug!("arrow I/O failure: {}", msg);
                BenchError::from(io_err)
            }
            ArrowError::ParquetError(msg) => {
                BenchError::ParquetError(ParquetError::General(msg))
            }
            other => BenchError::ArrowError(other),
        }
    }
}

impl From<std::collections::TryReserveError> for BenchError {
    fn from(err: std::collections::TryReserveError) -> Self {
        BenchError::AllocationError(format!("{}", err))
    }
}

impl From<rayon::ThreadPoolBuildError> for BenchError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        BenchError::ThreadPoolError(format!("{}", err))
    }
}

impl From<toml::de::Error> for BenchError {
    fn from(err: toml::de::Error) -> Self {
        BenchError::ConfigError(format!("TOML parsing error: {}", err))
    }
}

/// Result type alias for benchmark operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Error handling utilities
pub mod error {
    use super::BenchError;

    /// Process exit code for a failed run. Every failure class exits with 1.
    pub fn exit_code(_error: &BenchError) -> i32 {
        1
    }

    /// Convert error to user-friendly message with suggestions
    pub fn user_friendly_message(error: &BenchError) -> String {
        match error {
            BenchError::IoError(err) if err.kind() == std::io::ErrorKind::NotFound => {
                "File not found. Check the path passed on the command line.".to_string()
            }
            BenchError::IoError(err) if err.kind() == std::io::ErrorKind::PermissionDenied => {
                "Permission denied. Check the file permissions.".to_string()
            }
            BenchError::ParquetError(_) => {
                "The file could not be decoded. Is it a valid Parquet file?".to_string()
            }
            BenchError::AllocationError(_) => {
                "The memory pool ran out of memory. Try a smaller file.".to_string()
            }
            BenchError::ConfigError(msg) => {
                format!("Configuration error: {}. Check your settings.", msg)
            }
            _ => error.to_string(),
        }
    }

    /// Print an error to stderr the way every binary in this crate does
    pub fn report(error: &BenchError) {
        match error {
            BenchError::Usage(usage) => eprintln!("{}", usage),
            other => {
                eprintln!("Error: {}", other);
                log::info!("{}", user_friendly_message(other));
            }
        }
    }
}

/// Initialize stderr logging. `PARQUET_BENCH_LOG` overrides the level.
pub fn init_logging() {
    let _ = pretty_env_logger::formatted_timed_builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_env(LOG_ENV)
        .try_init();
}

// Common types and constants
pub const APP_NAME: &str = "parquet-bench";
pub const CONFIG_FILE: &str = "parquet-bench.toml";
pub const CONFIG_ENV: &str = "PARQUET_BENCH_CONFIG";
pub const LOG_ENV: &str = "PARQUET_BENCH_LOG";
pub const DEFAULT_ITERATIONS: usize = 100;
pub const DEFAULT_IPC_ITERATIONS: usize = 10;
pub const DEFAULT_THREAD_POOL_CAPACITY: usize = 1;
pub const DEFAULT_BATCH_SIZE: usize = 8192;

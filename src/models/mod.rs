//! Data models module
//!
//! Timing accumulators and the report printed at the end of a run.

pub mod result;

// Re-export commonly used types
pub use result::{
    BenchmarkReport,
    ConversionTimings,
    HostInfo,
    IterationTimings,
    TimingTotals,
};

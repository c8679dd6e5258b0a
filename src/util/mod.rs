//! Utility functions module
//!
//! Contains helpers for units formatting and averaging.

pub mod units;

// Re-export commonly used functions
pub use units::{
    average_seconds, calculate_rows_per_sec,
    format_bytes, format_duration, format_seconds,
};

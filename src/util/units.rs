//! Units formatting and conversion utilities
//!
//! Human-readable sizes and durations for diagnostics, plus the averaging
//! used by the report.

use std::time::Duration;

/// File or buffer size in binary units, for log lines
///
/// # Examples
/// ```
/// use parquet_bench::util::units::format_bytes;
///
/// assert_eq!(format_bytes(900), "900 B");
/// assert_eq!(format_bytes(3_670_016), "3.5 MiB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["KiB", "MiB", "GiB", "TiB", "PiB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    // Every 10 bits of magnitude is one step up the unit ladder
    let magnitude = 63 - bytes.leading_zeros();
    let step = ((magnitude / 10) as usize).min(UNITS.len());
    let scaled = bytes as f64 / (1u64 << (10 * step)) as f64;
    format!("{:.1} {}", scaled, UNITS[step - 1])
}

/// Format a duration with a unit suited to its magnitude
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use parquet_bench::util::units::format_duration;
///
/// assert_eq!(format_duration(Duration::from_micros(250)), "250μs");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.500s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();

    if micros < 1_000 {
        format!("{}μs", micros)
    } else if micros < 1_000_000 {
        format!("{:.2}ms", micros as f64 / 1_000.0)
    } else {
        format!("{:.3}s", duration.as_secs_f64())
    }
}

/// Format a second count the same way as [`format_duration`]
pub fn format_seconds(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return format!("{}s", secs);
    }
    format_duration(Duration::from_secs_f64(secs))
}

/// Average of a second total over `count` samples; zero when there are none
pub fn average_seconds(total_secs: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    total_secs / count as f64
}

/// Rows decoded per second
pub fn calculate_rows_per_sec(rows: u64, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 0.0;
    }
    rows as f64 / duration.as_secs_f64()
}

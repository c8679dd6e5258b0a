//! Benchmark result data models
//!
//! Per-iteration timings, the accumulators the run loop folds them into,
//! and the final report.

use std::time::Duration;

use crate::util::units::average_seconds;

/// Elapsed seconds of one "process one file" call
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IterationTimings {
    /// Reader build phase (footer + metadata)
    pub open_secs: f64,
    /// Full table materialization phase
    pub read_secs: f64,
    /// From before the file open until the table is complete
    pub total_secs: f64,
    /// Rows in the materialized table
    pub rows: usize,
}

impl IterationTimings {
    pub fn new(open: Duration, read: Duration, total: Duration, rows: usize) -> Self {
        Self {
            open_secs: open.as_secs_f64(),
            read_secs: read.as_secs_f64(),
            total_secs: total.as_secs_f64(),
            rows,
        }
    }
}

/// Running totals of the three timed phases
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimingTotals {
    pub open_secs: f64,
    pub read_secs: f64,
    pub total_secs: f64,
    pub rows: u64,
    pub iterations: usize,
}

impl TimingTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one successful iteration into the totals
    pub fn add(&mut self, timings: &IterationTimings) {
        self.open_secs += timings.open_secs;
        self.read_secs += timings.read_secs;
        self.total_secs += timings.total_secs;
        self.rows += timings.rows as u64;
        self.iterations += 1;
    }

    pub fn average_open(&self) -> f64 {
        average_seconds(self.open_secs, self.iterations)
    }

    pub fn average_read(&self) -> f64 {
        average_seconds(self.read_secs, self.iterations)
    }

    pub fn average_total(&self) -> f64 {
        average_seconds(self.total_secs, self.iterations)
    }

    /// Integer average of rows per iteration
    pub fn average_rows(&self) -> u64 {
        if self.iterations == 0 {
            0
        } else {
            self.rows / self.iterations as u64
        }
    }
}

/// Host capabilities printed with every report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostInfo {
    /// CPU cores available to this process
    pub cpu_cores: usize,
}

impl HostInfo {
    /// Detect the current host
    pub fn detect() -> Self {
        Self {
            cpu_cores: detect_cpu_cores(),
        }
    }

    /// Core count line followed by the worker pool line
    pub fn lines(&self, thread_pool_threads: usize) -> Vec<String> {
        vec![
            format!("Number of CPU cores available: {}", self.cpu_cores),
            format!(
                "Number of threads in the Arrow thread pool: {}",
                thread_pool_threads
            ),
        ]
    }
}

fn detect_cpu_cores() -> usize {
    std::thread::available_parallelism().map_or(1, usize::from)
}

/// Final result of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkReport {
    pub average_open_secs: f64,
    pub average_read_secs: f64,
    pub average_total_secs: f64,
    pub average_rows: u64,
    pub iterations: usize,
    pub host: HostInfo,
    /// Thread count read back from the worker pool after the run
    pub thread_pool_threads: usize,
}

impl BenchmarkReport {
    pub fn from_totals(
        totals: &TimingTotals,
        host: HostInfo,
        thread_pool_threads: usize,
    ) -> Self {
        Self {
            average_open_secs: totals.average_open(),
            average_read_secs: totals.average_read(),
            average_total_secs: totals.average_total(),
            average_rows: totals.average_rows(),
            iterations: totals.iterations,
            host,
            thread_pool_threads,
        }
    }

    /// Stdout lines of the Parquet read benchmark
    pub fn parquet_lines(&self) -> Vec<String> {
        let mut lines = self.average_lines("Average time to read file");
        lines.extend(self.host.lines(self.thread_pool_threads));
        lines
    }

    /// Stdout lines of the IPC read benchmark
    pub fn ipc_lines(&self) -> Vec<String> {
        let mut lines = self.average_lines("Average time to read table");
        lines.push(format!("Average rows per iteration: {}", self.average_rows));
        lines.extend(self.host.lines(self.thread_pool_threads));
        lines
    }

    fn average_lines(&self, read_label: &str) -> Vec<String> {
        vec![
            format!("Average time to open file: {} seconds", self.average_open_secs),
            format!("{}: {} seconds", read_label, self.average_read_secs),
            format!("Average total time: {} seconds", self.average_total_secs),
        ]
    }
}

/// Timings of a one-shot Parquet to IPC conversion
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConversionTimings {
    pub open_secs: f64,
    pub read_secs: f64,
    pub write_secs: f64,
    pub total_secs: f64,
    pub rows: usize,
}

impl ConversionTimings {
    /// Stdout lines of the conversion tool
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Time to open file: {} seconds", self.open_secs),
            format!("Time to read table: {} seconds", self.read_secs),
            format!("Time to write IPC file: {} seconds", self.write_secs),
            format!("Total time: {} seconds", self.total_secs),
        ]
    }
}

//! Benchmark run loop
//!
//! Runs the per-iteration operation a fixed number of times, strictly one
//! after another, folds the timings into totals and produces the report.
//! The first failing iteration aborts the run.

use indicatif::{ProgressBar, ProgressStyle};

use crate::bench::ipc::process_ipc_file;
use crate::bench::parquet_file::process_parquet_file;
use crate::bench::worker::WorkerPool;
use crate::config::{ReaderConfig, RunConfig};
use crate::io::MemoryPool;
use crate::models::{BenchmarkReport, HostInfo, IterationTimings, TimingTotals};
use crate::util::units::{format_bytes, format_seconds};
use crate::{BenchError, Result};

/// Sequential benchmark executor
pub struct BenchmarkRunner {
    run: RunConfig,
    reader: ReaderConfig,
    workers: WorkerPool,
}

impl BenchmarkRunner {
    /// Create a runner. Builds the worker pool with the configured capacity
    /// before any iteration runs.
    pub fn new(run: RunConfig, reader: ReaderConfig) -> Result<Self> {
        reader.validate()?;
        if run.iterations == 0 {
            return Err(BenchError::ConfigError(
                "Iteration count must be greater than 0".to_string(),
            ));
        }

        let workers = WorkerPool::new(reader.thread_pool_capacity)?;

        Ok(Self {
            run,
            reader,
            workers,
        })
    }

    pub fn workers(&self) -> &WorkerPool {
        &self.workers
    }

    /// Benchmark opening and reading the Parquet file
    pub fn run_parquet(&self) -> Result<BenchmarkReport> {
        let path = &self.run.file_path;
        self.run_with(|index| {
            let pool = MemoryPool::new();
            let timings = process_parquet_file(path, &self.reader, &pool, &self.workers)?;
            log::debug!(
                "iteration {}: {} pre-buffered",
                index + 1,
                format_bytes(pool.bytes_allocated())
            );
            Ok(timings)
        })
    }

    /// Benchmark opening and reading the file as Arrow IPC.
    ///
    /// The IPC reader decodes on a single thread; each iteration runs on the
    /// worker pool so the reported pool is the one that did the work.
    pub fn run_ipc(&self) -> Result<BenchmarkReport> {
        let path = &self.run.file_path;
        self.run_with(|_| self.workers.install(|| process_ipc_file(path)))
    }

    /// Invoke `iteration` exactly `iterations` times in order and average
    /// the results. Stops at the first error; partial totals are dropped.
    pub fn run_with<F>(&self, mut iteration: F) -> Result<BenchmarkReport>
    where
        F: FnMut(usize) -> Result<IterationTimings>,
    {
        let progress = progress_bar(self.run.iterations as u64);
        let mut totals = TimingTotals::new();

        log::info!(
            "benchmarking {} for {} iteration(s), pre_buffer={}, use_threads={}, workers={}",
            self.run.file_path.display(),
            self.run.iterations,
            self.reader.pre_buffer,
            self.reader.use_threads,
            self.workers.capacity()
        );

        for index in 0..self.run.iterations {
            let timings = match iteration(index) {
                Ok(timings) => timings,
                Err(err) => {
                    progress.abandon();
                    log::error!("iteration {} failed: {}", index + 1, err);
                    return Err(err);
                }
            };

            log::debug!(
                "iteration {}: open {}, read {}, total {}",
                index + 1,
                format_seconds(timings.open_secs),
                format_seconds(timings.read_secs),
                format_seconds(timings.total_secs)
            );

            totals.add(&timings);
            progress.inc(1);
        }
        progress.finish_and_clear();

        Ok(BenchmarkReport::from_totals(
            &totals,
            HostInfo::detect(),
            self.workers.capacity(),
        ))
    }
}

/// Run the Parquet benchmark off the async runtime and wait for it
pub async fn run_parquet_blocking(runner: BenchmarkRunner) -> Result<BenchmarkReport> {
    tokio::task::spawn_blocking(move || runner.run_parquet())
        .await
        .map_err(|e| BenchError::BenchmarkError(format!("Benchmark task failed: {}", e)))?
}

/// Run the IPC benchmark off the async runtime and wait for it
pub async fn run_ipc_blocking(runner: BenchmarkRunner) -> Result<BenchmarkReport> {
    tokio::task::spawn_blocking(move || runner.run_ipc())
        .await
        .map_err(|e| BenchError::BenchmarkError(format!("Benchmark task failed: {}", e)))?
}

fn progress_bar(iterations: u64) -> ProgressBar {
    let pb = ProgressBar::new(iterations);
    if let Ok(style) = ProgressStyle::with_template("[{bar:40}] {pos}/{len} iterations ({eta})") {
        pb.set_style(style);
    }
    pb
}

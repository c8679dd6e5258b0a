use parquet_bench::bench::{convert_parquet_to_ipc, WorkerPool};
use parquet_bench::config::{ConversionConfig, ReaderConfig};
use parquet_bench::io::MemoryPool;
use parquet_bench::models::{ConversionTimings, HostInfo};
use parquet_bench::{error, BenchError, Result};

#[tokio::main]
async fn main() {
    parquet_bench::init_logging();

    let args: Vec<String> = std::env::args().collect();
    match run(&args).await {
        Ok((timings, thread_pool_threads)) => {
            for line in HostInfo::detect().lines(thread_pool_threads) {
                println!("{}", line);
            }
            for line in timings.lines() {
                println!("{}", line);
            }
        }
        Err(err) => {
            error::report(&err);
            std::process::exit(error::exit_code(&err));
        }
    }
}

/// Convert once, returning the timings and the worker pool size
async fn run(args: &[String]) -> Result<(ConversionTimings, usize)> {
    let conversion = ConversionConfig::from_args(args)?;
    let reader = ReaderConfig::load()?;
    reader.validate()?;

    tokio::task::spawn_blocking(move || {
        let workers = WorkerPool::new(reader.thread_pool_capacity)?;
        let pool = MemoryPool::new();
        let timings = convert_parquet_to_ipc(
            &conversion.input_path,
            &conversion.output_path,
            &reader,
            &pool,
            &workers,
        )?;
        Ok((timings, workers.capacity()))
    })
    .await
    .map_err(|e| BenchError::BenchmarkError(format!("Conversion task failed: {}", e)))?
}

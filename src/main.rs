use parquet_bench::bench::{run_parquet_blocking, BenchmarkRunner};
use parquet_bench::config::{ReaderConfig, RunConfig};
use parquet_bench::models::BenchmarkReport;
use parquet_bench::{error, Result, DEFAULT_ITERATIONS};

#[tokio::main]
async fn main() {
    parquet_bench::init_logging();

    let args: Vec<String> = std::env::args().collect();
    match run(&args).await {
        Ok(report) => {
            for line in report.parquet_lines() {
                println!("{}", line);
            }
        }
        Err(err) => {
            error::report(&err);
            std::process::exit(error::exit_code(&err));
        }
    }
}

async fn run(args: &[String]) -> Result<BenchmarkReport> {
    let run = RunConfig::from_args(args, DEFAULT_ITERATIONS)?;
    let reader = ReaderConfig::load()?;

    // The worker pool capacity is fixed here, before the first iteration
    let runner = BenchmarkRunner::new(run, reader)?;
    run_parquet_blocking(runner).await
}

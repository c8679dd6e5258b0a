use parquet_bench::bench::{run_ipc_blocking, BenchmarkRunner};
use parquet_bench::config::{ReaderConfig, RunConfig};
use parquet_bench::models::BenchmarkReport;
use parquet_bench::{error, Result, DEFAULT_IPC_ITERATIONS};

#[tokio::main]
async fn main() {
    parquet_bench::init_logging();

    let args: Vec<String> = std::env::args().collect();
    match run(&args).await {
        Ok(report) => {
            for line in report.ipc_lines() {
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
    let run = RunConfig::parse(args, "<ipc_file_path> [iterations]", DEFAULT_IPC_ITERATIONS)?;
    let runner = BenchmarkRunner::new(run, ReaderConfig::load()?)?;
    run_ipc_blocking(runner).await
}

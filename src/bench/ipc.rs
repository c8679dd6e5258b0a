//! Arrow IPC file benchmark and Parquet to IPC conversion

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use arrow::compute::concat_batches;
use arrow::ipc::reader::FileReader;
use arrow::ipc::writer::{FileWriter, IpcWriteOptions};
use arrow::ipc::CompressionType;
use arrow::record_batch::RecordBatch;

use crate::bench::parquet_file::ParquetReader;
use crate::bench::worker::WorkerPool;
use crate::config::ReaderConfig;
use crate::io::{open_random_access, MemoryPool};
use crate::models::{ConversionTimings, IterationTimings};
use crate::util::units::format_duration;
use crate::Result;

/// Open an IPC file and read every record batch into one table.
///
/// `open_secs` covers opening the file and parsing its footer, `read_secs`
/// reading and concatenating all batches.
pub fn process_ipc_file(path: &Path) -> Result<IterationTimings> {
    let start = Instant::now();

    let open_start = Instant::now();
    let file = File::open(path)?;
    let reader = FileReader::try_new(BufReader::new(file), None)?;
    let open = open_start.elapsed();

    log::debug!(
        "{}: {} record batch(es)",
        path.display(),
        reader.num_batches()
    );

    let read_start = Instant::now();
    let schema = reader.schema();
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    let table = concat_batches(&schema, &batches)?;
    let read = read_start.elapsed();

    let total = start.elapsed();

    Ok(IterationTimings::new(open, read, total, table.num_rows()))
}

/// Write `table` to `output` as an IPC file with zstd-compressed buffers
pub fn write_ipc_file(table: &RecordBatch, output: &Path) -> Result<()> {
    let options = IpcWriteOptions::default().try_with_compression(Some(CompressionType::ZSTD))?;
    let file = File::create(output)?;

    let mut writer = FileWriter::try_new_with_options(file, table.schema_ref(), options)?;
    writer.write(table)?;
    writer.finish()?;

    Ok(())
}

/// Read `input` as Parquet once and write it to `output` as Arrow IPC
pub fn convert_parquet_to_ipc(
    input: &Path,
    output: &Path,
    config: &ReaderConfig,
    pool: &MemoryPool,
    workers: &WorkerPool,
) -> Result<ConversionTimings> {
    let start = Instant::now();

    let open_start = Instant::now();
    let reader = ParquetReader::build(open_random_access(input)?, config)?;
    let open = open_start.elapsed();

    let read_start = Instant::now();
    let table = reader.read_table(pool, workers)?;
    let read = read_start.elapsed();

    let write_start = Instant::now();
    write_ipc_file(&table, output)?;
    let write = write_start.elapsed();

    let total = start.elapsed();

    log::info!(
        "converted {} rows to {} in {}",
        table.num_rows(),
        output.display(),
        format_duration(total)
    );

    Ok(ConversionTimings {
        open_secs: open.as_secs_f64(),
        read_secs: read.as_secs_f64(),
        write_secs: write.as_secs_f64(),
        total_secs: total.as_secs_f64(),
        rows: table.num_rows(),
    })
}

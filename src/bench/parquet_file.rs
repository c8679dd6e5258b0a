//! Parquet read benchmark
//!
//! One iteration opens a Parquet file, builds a reader over it, and
//! materializes the whole file into a single Arrow table, timing each phase.

use std::path::Path;
use std::time::Instant;

use arrow::compute::concat_batches;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::{
    ArrowReaderMetadata, ArrowReaderOptions, ParquetRecordBatchReaderBuilder,
};
use parquet::file::reader::ChunkReader;
use rayon::prelude::*;

use crate::bench::worker::WorkerPool;
use crate::config::ReaderConfig;
use crate::io::{open_random_access, MemoryPool, RandomAccessFile};
use crate::models::IterationTimings;
use crate::util::units::{calculate_rows_per_sec, format_bytes, format_duration};
use crate::{BenchError, Result};

/// A Parquet reader whose footer has been parsed and is ready to decode
pub struct ParquetReader {
    source: RandomAccessFile,
    metadata: ArrowReaderMetadata,
    config: ReaderConfig,
}

impl ParquetReader {
    /// Parse the file footer and build a reader with `config`
    pub fn build(source: RandomAccessFile, config: &ReaderConfig) -> Result<Self> {
        let options = ArrowReaderOptions::new();
        let metadata = ArrowReaderMetadata::load(&source, options)?;

        log::debug!(
            "{}: {}, {} row group(s), {} rows",
            source.path().display(),
            format_bytes(source.size()),
            metadata.metadata().num_row_groups(),
            metadata.metadata().file_metadata().num_rows()
        );

        Ok(Self {
            source,
            metadata,
            config: config.clone(),
        })
    }

    /// Arrow schema of the file
    pub fn schema(&self) -> &SchemaRef {
        self.metadata.schema()
    }

    pub fn num_row_groups(&self) -> usize {
        self.metadata.metadata().num_row_groups()
    }

    /// Decode every row group and column into one table
    pub fn read_table(&self, pool: &MemoryPool, workers: &WorkerPool) -> Result<RecordBatch> {
        if self.config.pre_buffer {
            let buffered = self.source.read_all(pool)?;
            self.decode(buffered, workers)
        } else {
            self.decode(self.source.clone(), workers)
        }
    }

    fn decode<T>(&self, input: T, workers: &WorkerPool) -> Result<RecordBatch>
    where
        T: ChunkReader + Clone + Send + Sync + 'static,
    {
        let row_groups = self.num_row_groups();

        let batches: Vec<RecordBatch> = if self.config.use_threads && row_groups > 1 {
            let per_group = workers.install(|| {
                (0..row_groups)
                    .into_par_iter()
                    .map(|index| self.decode_row_groups(input.clone(), vec![index]))
                    .collect::<Result<Vec<_>>>()
            })?;
            per_group.into_iter().flatten().collect()
        } else {
            self.decode_row_groups(input, (0..row_groups).collect())?
        };

        Ok(concat_batches(self.schema(), &batches)?)
    }

    fn decode_row_groups<T>(&self, input: T, row_groups: Vec<usize>) -> Result<Vec<RecordBatch>>
    where
        T: ChunkReader + 'static,
    {
        let reader = ParquetRecordBatchReaderBuilder::new_with_metadata(input, self.metadata.clone())
            .with_batch_size(self.config.batch_size)
            .with_row_groups(row_groups)
            .build()?;

        reader
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(BenchError::from)
    }
}

/// Open, build, and fully read `path` once.
///
/// `open_secs` covers the reader build, `read_secs` the table
/// materialization and `total_secs` everything from before the file open.
pub fn process_parquet_file(
    path: &Path,
    config: &ReaderConfig,
    pool: &MemoryPool,
    workers: &WorkerPool,
) -> Result<IterationTimings> {
    let start = Instant::now();
    let source = open_random_access(path)?;

    let open_start = Instant::now();
    let reader = ParquetReader::build(source, config)?;
    let open = open_start.elapsed();

    let read_start = Instant::now();
    let table = reader.read_table(pool, workers)?;
    let read = read_start.elapsed();

    let total = start.elapsed();

    log::debug!(
        "read {} rows x {} columns ({:.0} rows/s): open {}, read {}, total {}",
        table.num_rows(),
        table.num_columns(),
        calculate_rows_per_sec(table.num_rows() as u64, read),
        format_duration(open),
        format_duration(read),
        format_duration(total)
    );

    Ok(IterationTimings::new(open, read, total, table.num_rows()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use parquet::arrow::ArrowWriter;
    use parquet::file::properties::WriterProperties;
    use std::fs::File;
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Write `rows` rows split into row groups of `group_rows`
    fn write_fixture(dir: &TempDir, rows: i64, group_rows: usize) -> std::path::PathBuf {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("value", DataType::Float64, true),
            Field::new("label", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from_iter_values(0..rows)),
                Arc::new(Float64Array::from_iter_values((0..rows).map(|i| i as f64 * 0.5))),
                Arc::new(StringArray::from_iter_values((0..rows).map(|i| format!("row-{}", i)))),
            ],
        )
        .unwrap();

        let path = dir.path().join("fixture.parquet");
        let props = WriterProperties::builder()
            .set_max_row_group_size(group_rows)
            .build();
        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, Some(props)).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        path
    }

    fn read_with(path: &Path, config: &ReaderConfig) -> RecordBatch {
        let pool = MemoryPool::new();
        let workers = WorkerPool::new(config.thread_pool_capacity).unwrap();
        let reader = ParquetReader::build(open_random_access(path).unwrap(), config).unwrap();
        reader.read_table(&pool, &workers).unwrap()
    }

    #[test]
    fn test_read_table_all_rows_in_order() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir, 1000, 300);

        let table = read_with(&path, &ReaderConfig::default());
        assert_eq!(table.num_rows(), 1000);
        assert_eq!(table.num_columns(), 3);

        let ids = table.column(0).as_any().downcast_ref::<Int64Array>().unwrap();
        assert_eq!(ids.value(0), 0);
        assert_eq!(ids.value(999), 999);
        assert!(ids.values().windows(2).all(|w| w[0] + 1 == w[1]));
    }

    #[test]
    fn test_reader_options_produce_same_table() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir, 500, 128);

        let expected = read_with(&path, &ReaderConfig::default());
        for (pre_buffer, use_threads, capacity) in [(false, false, 1), (false, true, 4), (true, true, 2)] {
            let config = ReaderConfig {
                pre_buffer,
                use_threads,
                thread_pool_capacity: capacity,
                batch_size: 64,
            };
            assert_eq!(read_with(&path, &config), expected);
        }
    }

    #[test]
    fn test_pre_buffer_allocates_from_pool() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir, 100, 100);
        let file_len = std::fs::metadata(&path).unwrap().len();

        let workers = WorkerPool::new(1).unwrap();
        let pool = MemoryPool::new();
        process_parquet_file(&path, &ReaderConfig::default(), &pool, &workers).unwrap();
        assert_eq!(pool.bytes_allocated(), file_len);

        let pool = MemoryPool::new();
        let config = ReaderConfig {
            pre_buffer: false,
            ..ReaderConfig::default()
        };
        process_parquet_file(&path, &config, &pool, &workers).unwrap();
        assert_eq!(pool.bytes_allocated(), 0);
    }

    #[test]
    fn test_process_parquet_file_timings() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir, 200, 50);

        let workers = WorkerPool::new(1).unwrap();
        let pool = MemoryPool::new();
        let timings = process_parquet_file(&path, &ReaderConfig::default(), &pool, &workers).unwrap();

        assert_eq!(timings.rows, 200);
        assert!(timings.open_secs >= 0.0 && timings.read_secs >= 0.0);
        assert!(timings.total_secs + 1e-9 >= timings.open_secs + timings.read_secs);
    }

    #[test]
    fn test_missing_file_fails() {
        let workers = WorkerPool::new(1).unwrap();
        let pool = MemoryPool::new();
        let result = process_parquet_file(
            Path::new("/no/such/file.parquet"),
            &ReaderConfig::default(),
            &pool,
            &workers,
        );
        assert!(matches!(result, Err(BenchError::IoError(_))));
    }

    #[test]
    fn test_malformed_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("not.parquet");
        std::fs::write(&path, b"this is not a parquet file at all").unwrap();

        let workers = WorkerPool::new(1).unwrap();
        let pool = MemoryPool::new();
        let result = process_parquet_file(&path, &ReaderConfig::default(), &pool, &workers);
        assert!(matches!(result, Err(BenchError::ParquetError(_))));
    }
}

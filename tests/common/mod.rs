//! Fixture helpers shared by the integration tests

#![allow(dead_code)]

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Random table with an id, a measurement and a category column
pub fn random_table(rows: usize, seed: u64) -> RecordBatch {
    let mut rng = SmallRng::seed_from_u64(seed);
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("measurement", DataType::Float64, false),
        Field::new("category", DataType::Utf8, false),
    ]));

    let measurements: Vec<f64> = (0..rows).map(|_| rng.gen_range(-1000.0..1000.0)).collect();
    let categories: Vec<String> = (0..rows)
        .map(|_| format!("cat-{}", rng.gen_range(0..16)))
        .collect();

    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from_iter_values(0..rows as i64)),
            Arc::new(Float64Array::from(measurements)),
            Arc::new(StringArray::from(categories)),
        ],
    )
    .expect("valid fixture batch")
}

/// Write a Parquet fixture split into row groups of `group_rows`
pub fn write_parquet(dir: &Path, rows: usize, group_rows: usize) -> PathBuf {
    let table = random_table(rows, 42);
    let path = dir.join("fixture.parquet");

    let props = WriterProperties::builder()
        .set_max_row_group_size(group_rows)
        .build();
    let file = File::create(&path).expect("create fixture");
    let mut writer = ArrowWriter::try_new(file, table.schema(), Some(props)).expect("writer");
    writer.write(&table).expect("write fixture");
    writer.close().expect("close fixture");

    path
}

/// Run a crate binary with a config location that never exists, so the
/// host's own configuration cannot leak into the test
pub fn run_binary(exe: &str, args: &[&str], config_dir: &Path) -> Output {
    run_binary_with_config(exe, args, &config_dir.join("absent.toml"))
}

/// Run a crate binary reading its reader configuration from `config_file`
pub fn run_binary_with_config(exe: &str, args: &[&str], config_file: &Path) -> Output {
    Command::new(exe)
        .args(args)
        .env(parquet_bench::CONFIG_ENV, config_file)
        .env_remove(parquet_bench::LOG_ENV)
        .output()
        .expect("failed to launch binary")
}

/// Value between `prefix` and `suffix` on the matching stdout line
pub fn field<'a>(stdout: &'a str, prefix: &str, suffix: &str) -> &'a str {
    let line = stdout
        .lines()
        .find(|line| line.starts_with(prefix))
        .unwrap_or_else(|| panic!("missing line {:?} in {:?}", prefix, stdout));
    line[prefix.len()..].trim_end_matches(suffix).trim()
}

pub fn seconds(stdout: &str, prefix: &str) -> f64 {
    field(stdout, prefix, "seconds").parse().expect("float seconds")
}

//! Configuration management module
//!
//! Handles command line parsing into a run configuration and loading and
//! validation of the reader configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{
    BenchError, Result, APP_NAME, CONFIG_ENV, CONFIG_FILE, DEFAULT_BATCH_SIZE,
    DEFAULT_THREAD_POOL_CAPACITY,
};

/// What to benchmark and how often. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// File to open and read on every iteration
    pub file_path: PathBuf,
    /// Number of sequential iterations
    pub iterations: usize,
}

impl RunConfig {
    /// Parse `<program> <file_path> [iterations]`.
    ///
    /// `args` includes the program name at index 0. Wrong argument counts
    /// and iteration counts that are not positive integers are usage errors.
    pub fn from_args(args: &[String], default_iterations: usize) -> Result<Self> {
        Self::parse(args, "<parquet_file_path> [iterations]", default_iterations)
    }

    /// Same as [`RunConfig::from_args`] with a custom argument synopsis for
    /// the usage line
    pub fn parse(args: &[String], synopsis: &str, default_iterations: usize) -> Result<Self> {
        let program = args.first().map(String::as_str).unwrap_or(APP_NAME);
        let usage = || BenchError::Usage(usage_line(program, synopsis));

        if args.len() < 2 || args.len() > 3 {
            return Err(usage());
        }

        let iterations = match args.get(2) {
            Some(raw) => parse_iterations(raw).ok_or_else(usage)?,
            None => default_iterations,
        };

        Ok(Self {
            file_path: PathBuf::from(&args[1]),
            iterations,
        })
    }
}

/// Input and output of the one-shot Parquet to IPC conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

impl ConversionConfig {
    /// Parse `<program> <parquet_file_path> <output_ipc_file_path>`
    pub fn from_args(args: &[String]) -> Result<Self> {
        let program = args.first().map(String::as_str).unwrap_or(APP_NAME);
        if args.len() != 3 {
            return Err(BenchError::Usage(usage_line(
                program,
                "<parquet_file_path> <output_ipc_file_path>",
            )));
        }

        Ok(Self {
            input_path: PathBuf::from(&args[1]),
            output_path: PathBuf::from(&args[2]),
        })
    }
}

/// Build the usage line printed for malformed invocations
pub fn usage_line(program: &str, arguments: &str) -> String {
    format!("Usage: {} {}", program, arguments)
}

fn parse_iterations(raw: &str) -> Option<usize> {
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(n),
    }
}

/// Keys a config file may name but never changes
const FIXED_READER_KEYS: [&str; 4] = [
    "pre_buffer",
    "use_threads",
    "memory_pool",
    "thread_pool_capacity",
];

/// Reader options applied identically on every iteration.
///
/// Pre-buffering, threaded decoding and the worker pool capacity are fixed
/// for every run. A config file can only tune `batch_size`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderConfig {
    /// Fetch the whole file in one read before decoding
    pub pre_buffer: bool,
    /// Decode row groups on the worker thread pool
    pub use_threads: bool,
    /// Worker thread pool capacity
    pub thread_pool_capacity: usize,
    /// Rows per decoded record batch
    pub batch_size: usize,
}

/// The part of [`ReaderConfig`] a config file may set
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReaderOverrides {
    batch_size: Option<usize>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            pre_buffer: true,
            use_threads: true,
            thread_pool_capacity: DEFAULT_THREAD_POOL_CAPACITY,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ReaderConfig {
    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.thread_pool_capacity == 0 {
            return Err(BenchError::ConfigError(
                "Thread pool capacity must be greater than 0".to_string(),
            ));
        }

        const MAX_THREADS: usize = 1024;
        if self.thread_pool_capacity > MAX_THREADS {
            return Err(BenchError::ConfigError(format!(
                "Thread pool capacity too large: {} (max: {})",
                self.thread_pool_capacity, MAX_THREADS
            )));
        }

        if self.batch_size == 0 {
            return Err(BenchError::ConfigError(
                "Batch size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Load configuration from the standard config file location.
    /// Returns the default configuration if the file doesn't exist.
    pub fn load() -> Result<Self> {
        match Self::config_file_path() {
            Ok(config_path) => Self::load_from(&config_path),
            Err(err) => {
                log::debug!("no config location ({}), using defaults", err);
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from an explicit path. Validation is left to the
    /// caller that builds the worker pool.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| {
            BenchError::ConfigError(format!(
                "Failed to read config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        let table: toml::Table = toml::from_str(&content).map_err(|e| {
            BenchError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        for key in FIXED_READER_KEYS.iter().filter(|key| table.contains_key(**key)) {
            log::warn!(
                "ignoring '{}' in {}: the reader always runs with its fixed setting",
                key,
                config_path.display()
            );
        }

        let overrides: ReaderOverrides = toml::Value::Table(table).try_into().map_err(|e| {
            BenchError::ConfigError(format!(
                "Invalid config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        log::info!("loaded reader configuration from {}", config_path.display());
        Ok(Self {
            batch_size: overrides.batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
            ..Self::default()
        })
    }

    /// Get the configuration file path.
    /// `$PARQUET_BENCH_CONFIG` wins, then `$CONFIG_HOME/parquet-bench/parquet-bench.toml`.
    pub fn config_file_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_dir = dirs::config_dir().ok_or_else(|| {
            BenchError::ConfigError("Unable to determine config directory".to_string())
        })?;

        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_args_default_iterations() {
        let config = RunConfig::from_args(&args(&["bench", "data.parquet"]), 100).unwrap();
        assert_eq!(config.file_path, PathBuf::from("data.parquet"));
        assert_eq!(config.iterations, 100);
    }

    #[test]
    fn test_from_args_explicit_iterations() {
        let config = RunConfig::from_args(&args(&["bench", "data.parquet", "7"]), 100).unwrap();
        assert_eq!(config.iterations, 7);
    }

    #[test]
    fn test_from_args_wrong_count() {
        for bad in [vec!["bench"], vec!["bench", "a", "1", "extra"]] {
            match RunConfig::from_args(&args(&bad), 100) {
                Err(BenchError::Usage(line)) => {
                    assert!(line.starts_with("Usage: bench"));
                    assert!(line.contains("<parquet_file_path>"));
                }
                other => panic!("expected usage error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_from_args_rejects_bad_iterations() {
        for bad in ["0", "-3", "ten", ""] {
            let result = RunConfig::from_args(&args(&["bench", "a.parquet", bad]), 100);
            assert!(matches!(result, Err(BenchError::Usage(_))), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_parse_custom_synopsis() {
        let err = RunConfig::parse(&args(&["ipc-bench"]), "<ipc_file_path> [iterations]", 10)
            .unwrap_err();
        assert_eq!(err.to_string(), "Usage: ipc-bench <ipc_file_path> [iterations]");

        let config = RunConfig::parse(&args(&["ipc-bench", "t.arrow"]), "<ipc_file_path>", 10).unwrap();
        assert_eq!(config.iterations, 10);
    }

    #[test]
    fn test_conversion_from_args() {
        let config = ConversionConfig::from_args(&args(&["conv", "in.parquet", "out.arrow"])).unwrap();
        assert_eq!(config.input_path, PathBuf::from("in.parquet"));
        assert_eq!(config.output_path, PathBuf::from("out.arrow"));

        let err = ConversionConfig::from_args(&args(&["conv", "in.parquet"])).unwrap_err();
        assert!(err.to_string().contains("<output_ipc_file_path>"));
    }

    #[test]
    fn test_reader_config_defaults() {
        let config = ReaderConfig::default();
        assert!(config.pre_buffer);
        assert!(config.use_threads);
        assert_eq!(config.thread_pool_capacity, 1);
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reader_config_validation() {
        let with_capacity = |thread_pool_capacity| ReaderConfig {
            thread_pool_capacity,
            ..ReaderConfig::default()
        };
        assert!(with_capacity(0).validate().is_err());
        assert!(with_capacity(4096).validate().is_err());

        let no_batch = ReaderConfig {
            batch_size: 0,
            ..ReaderConfig::default()
        };
        assert!(no_batch.validate().is_err());
    }

    #[test]
    fn test_load_batch_size_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&path, "batch_size = 1024\n").unwrap();

        let loaded = ReaderConfig::load_from(&path).unwrap();
        assert_eq!(loaded.batch_size, 1024);
        assert!(loaded.pre_buffer);
    }

    #[test]
    fn test_file_cannot_override_fixed_settings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "thread_pool_capacity = 4\npre_buffer = false\nuse_threads = false\nmemory_pool = \"system\"\n",
        )
        .unwrap();

        let loaded = ReaderConfig::load_from(&path).unwrap();
        assert_eq!(loaded, ReaderConfig::default());
    }

    #[test]
    fn test_load_leaves_validation_to_caller() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&path, "batch_size = 0\n").unwrap();

        let loaded = ReaderConfig::load_from(&path).unwrap();
        assert_eq!(loaded.batch_size, 0);
        assert!(matches!(loaded.validate(), Err(BenchError::ConfigError(_))));
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = ReaderConfig::load_from(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, ReaderConfig::default());
    }

    #[test]
    fn test_load_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&path, "batch_size = \"many\"").unwrap();
        assert!(matches!(ReaderConfig::load_from(&path), Err(BenchError::ConfigError(_))));

        fs::write(&path, "not toml at all [").unwrap();
        assert!(matches!(ReaderConfig::load_from(&path), Err(BenchError::ConfigError(_))));
    }
}

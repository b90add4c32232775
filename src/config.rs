use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::workload::{Mix, SourceMode};
use crate::{ListBenchError, Result, MAX_VALUE};

/// The parameters of one benchmark invocation.
///
/// A config is immutable once handed to a `BenchmarkRunner`. It can be built
/// in code, read from a JSON file or collected by the interactive prompt.
///
/// ```rust
/// # use listbench::{BenchmarkConfig, Mix};
/// let config = BenchmarkConfig {
///     initial_size: 1000,
///     operations: 10_000,
///     mix: Mix::new(0.8, 0.1, 0.1),
///     runs: 5,
///     threads: 4,
///     ..BenchmarkConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Number of distinct values the list holds when a trial starts (`n`).
    pub initial_size: u32,
    /// Number of operations every trial performs in total (`m`).
    pub operations: u64,
    /// Fractions of Member, Insert and Delete operations.
    pub mix: Mix,
    /// Number of trials.
    pub runs: u32,
    /// Number of worker threads per trial.
    pub threads: u32,
    /// Seed for every random draw of the run. Drawn from the OS when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Whether workers own their generators or share one.
    #[serde(default)]
    pub source: SourceMode,
}

impl Default for BenchmarkConfig {
    fn default() -> BenchmarkConfig {
        BenchmarkConfig {
            initial_size: 1000,
            operations: 10_000,
            mix: Mix::default(),
            runs: 1,
            threads: 1,
            seed: None,
            source: SourceMode::default(),
        }
    }
}

impl BenchmarkConfig {
    /// Reads a config from a JSON file and validates it.
    ///
    /// # Errors
    ///
    /// It propagates I/O and deserialization errors, and any error from
    /// `validate`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<BenchmarkConfig> {
        let text = fs::read_to_string(path)?;
        let config: BenchmarkConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the config before any trial runs.
    pub fn validate(&self) -> Result<()> {
        self.mix.validate()?;
        if self.threads == 0 {
            return Err(ListBenchError::InvalidThreadCount);
        }
        if self.runs == 0 {
            return Err(ListBenchError::InvalidRunCount);
        }
        if self.initial_size > MAX_VALUE {
            return Err(ListBenchError::PopulationTooLarge {
                n: self.initial_size,
            });
        }
        Ok(())
    }
}

//! YAML configuration for a generation run.

use crate::error::{FixtureError, Result};
use crate::profile::{Compression, PageVersion};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default output root, relative to the working directory
pub const DEFAULT_OUTPUT: &str = "fixtures/parquet";

/// Largest benchmark exponent accepted (2^30 rows)
pub const MAX_BENCH_EXPONENT: u32 = 30;

/// Which dimensions and sizes one run covers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    /// Output root every artifact path is relative to
    pub output: PathBuf,
    /// Run the canonical case × profile pass
    pub matrix: bool,
    pub page_versions: Vec<PageVersion>,
    pub dictionary: Vec<bool>,
    pub codecs: Vec<Compression>,
    pub benchmarks: BenchConfig,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            matrix: true,
            page_versions: PageVersion::ALL.to_vec(),
            dictionary: vec![true, false],
            codecs: vec![Compression::Lz4, Compression::None, Compression::Snappy],
            benchmarks: BenchConfig::default(),
        }
    }
}

/// Benchmark pass settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub enabled: bool,
    pub min_exponent: u32,
    pub max_exponent: u32,
    pub step: u32,
    /// Explicit row counts; when non-empty the exponent range is ignored
    pub sizes: Vec<usize>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_exponent: 10,
            max_exponent: 20,
            step: 2,
            sizes: Vec::new(),
        }
    }
}

impl BenchConfig {
    /// Row counts of the benchmark files, in generation order.
    pub fn sizes(&self) -> Vec<usize> {
        if !self.sizes.is_empty() {
            return self.sizes.clone();
        }
        if self.step == 0 {
            return Vec::new();
        }
        (self.min_exponent..=self.max_exponent)
            .step_by(self.step as usize)
            .map(|e| 1usize << e)
            .collect()
    }
}

impl MatrixConfig {
    /// Default configuration writing below `output`.
    pub fn with_output(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            ..Self::default()
        }
    }

    /// Load and validate a YAML configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| FixtureError::io(path, e))?;
        let config: MatrixConfig = serde_yaml_ng::from_str(&content)
            .map_err(|e| FixtureError::config(path.display().to_string(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would produce an empty or unbounded matrix.
    pub fn validate(&self) -> Result<()> {
        let fail = |message: &str| Err(FixtureError::config("config", message));

        if self.matrix {
            if self.page_versions.is_empty() {
                return fail("page_versions must not be empty");
            }
            if self.dictionary.is_empty() {
                return fail("dictionary must list at least one of true, false");
            }
            if self.codecs.is_empty() {
                return fail("codecs must not be empty");
            }
            reject_duplicates("page_versions", &self.page_versions)?;
            reject_duplicates("dictionary", &self.dictionary)?;
            reject_duplicates("codecs", &self.codecs)?;
        }

        let bench = &self.benchmarks;
        if bench.enabled && bench.sizes.is_empty() {
            if bench.step == 0 {
                return fail("benchmarks.step must be at least 1");
            }
            if bench.min_exponent > bench.max_exponent {
                return fail("benchmarks.min_exponent is greater than benchmarks.max_exponent");
            }
            if bench.max_exponent > MAX_BENCH_EXPONENT {
                return Err(FixtureError::config(
                    "config",
                    format!(
                        "benchmarks.max_exponent {} exceeds {}",
                        bench.max_exponent, MAX_BENCH_EXPONENT
                    ),
                ));
            }
        }
        if bench.enabled && bench.sizes.contains(&0) {
            return fail("benchmarks.sizes must be positive");
        }
        if bench.enabled {
            reject_duplicates("benchmarks.sizes", &bench.sizes)?;
        }

        Ok(())
    }
}

/// Each listed value yields its own set of paths; a repeat would write the
/// same files twice.
fn reject_duplicates<T: PartialEq + fmt::Display>(name: &str, values: &[T]) -> Result<()> {
    for (i, value) in values.iter().enumerate() {
        if values[..i].contains(value) {
            return Err(FixtureError::config(
                "config",
                format!("{} lists {} more than once", name, value),
            ));
        }
    }
    Ok(())
}

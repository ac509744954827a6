// Sweep Configuration
// Immutable description of one sweep, loaded from YAML or built in code

use crate::error::{ServiceError, ServiceResult};
use crate::extract::ExtractionPolicy;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Simulator variants swept when no configuration list is given
pub const DEFAULT_CONFIGURATIONS: &[&str] = &[
    "1C.fullBW.nopref",
    "1C.fullBW.mypref",
    "1C.limitBW.nopref",
    "1C.limitBW.mypref",
    "1C.fullBW.custom",
    "1C.limitBW.custom",
    "1C.fullBW.pythia",
    "1C.limitBW.pythia",
];

/// Everything a sweep needs to know, fixed for the whole run.
///
/// Every field has a default, so a YAML file only needs the keys it changes:
///
/// ```yaml
/// binary_dir: bin
/// trace_dirs: [traces/GAP]
/// workers: 8
/// configurations:
///   - 1C.fullBW.nopref
///   - 1C.fullBW.pythia
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Directory holding one simulator binary per configuration id
    pub binary_dir: PathBuf,
    /// Directories searched (non-recursively) for trace files
    pub trace_dirs: Vec<PathBuf>,
    /// Trace file suffixes, e.g. `gz` or `.xz`
    pub trace_extensions: Vec<String>,
    /// Value of `--warmup-instructions`
    pub warmup_instructions: u64,
    /// Value of `--simulation-instructions`
    pub simulation_instructions: u64,
    /// Configuration ids in report column order
    pub configurations: Vec<String>,
    /// Maximum number of simulator processes running at once
    pub workers: usize,
    /// Where the JSON result record is written
    pub output: PathBuf,
    /// Which IPC report to keep when a run prints several
    pub metric_match: ExtractionPolicy,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            binary_dir: PathBuf::from("bin"),
            trace_dirs: vec![
                PathBuf::from("traces/GAP"),
                PathBuf::from("traces/charlie"),
            ],
            trace_extensions: vec!["gz".to_string(), "xz".to_string()],
            warmup_instructions: 10_000_000,
            simulation_instructions: 50_000_000,
            configurations: DEFAULT_CONFIGURATIONS
                .iter()
                .map(|c| c.to_string())
                .collect(),
            workers: 4,
            output: PathBuf::from("lab_results.json"),
            metric_match: ExtractionPolicy::First,
        }
    }
}

impl SweepConfig {
    /// Load and validate a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> ServiceResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ServiceError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config: SweepConfig =
            serde_yaml::from_str(&content).map_err(|source| ServiceError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the scheduler and the report rely on
    pub fn validate(&self) -> ServiceResult<()> {
        if self.workers == 0 {
            return Err(ServiceError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for id in &self.configurations {
            if id.trim().is_empty() {
                return Err(ServiceError::InvalidConfig(
                    "configuration ids must not be empty".to_string(),
                ));
            }
            if !seen.insert(id.as_str()) {
                return Err(ServiceError::InvalidConfig(format!(
                    "configuration '{}' is listed more than once",
                    id
                )));
            }
        }

        Ok(())
    }

    /// Path of the simulator binary for a configuration id
    pub fn binary_for(&self, configuration: &str) -> PathBuf {
        self.binary_dir.join(configuration)
    }
}

pub mod plan;
pub mod report;
pub mod run;

use std::path::PathBuf;

use clap::Args;

use sweep_service::{ExtractionPolicy, ServiceResult, SweepConfig};

/// Sweep settings shared by `run` and `plan`; flags override the config file
#[derive(Args, Debug, Default)]
pub struct SweepArgs {
    /// YAML sweep configuration (defaults apply to anything it leaves out)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding one simulator binary per configuration
    #[arg(long, value_name = "DIR")]
    pub bin_dir: Option<PathBuf>,

    /// Trace directory to search (can be repeated)
    #[arg(long = "trace-dir", value_name = "DIR")]
    pub trace_dirs: Vec<PathBuf>,

    /// Trace file extension (can be repeated)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Configuration id to sweep (can be repeated, keeps the given order)
    #[arg(long = "configuration", short = 'c', value_name = "ID")]
    pub configurations: Vec<String>,

    /// Warm-up instruction count passed to the simulator
    #[arg(long, value_name = "N")]
    pub warmup: Option<u64>,

    /// Simulation instruction count passed to the simulator
    #[arg(long, value_name = "N")]
    pub sim: Option<u64>,

    /// Maximum simulator processes running at once
    #[arg(long, short = 'j', value_name = "N")]
    pub jobs: Option<usize>,

    /// Where to write the JSON result record
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Keep the last IPC report of each run instead of the first
    #[arg(long)]
    pub last_match: bool,
}

impl SweepArgs {
    /// Load the config file (or defaults) and apply command-line overrides
    pub fn resolve(&self) -> ServiceResult<SweepConfig> {
        let mut config = match &self.config {
            Some(path) => SweepConfig::from_file(path)?,
            None => SweepConfig::default(),
        };

        if let Some(dir) = &self.bin_dir {
            config.binary_dir = dir.clone();
        }
        if !self.trace_dirs.is_empty() {
            config.trace_dirs = self.trace_dirs.clone();
        }
        if !self.extensions.is_empty() {
            config.trace_extensions = self.extensions.clone();
        }
        if !self.configurations.is_empty() {
            config.configurations = self.configurations.clone();
        }
        if let Some(warmup) = self.warmup {
            config.warmup_instructions = warmup;
        }
        if let Some(sim) = self.sim {
            config.simulation_instructions = sim;
        }
        if let Some(jobs) = self.jobs {
            config.workers = jobs;
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if self.last_match {
            config.metric_match = ExtractionPolicy::Last;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Print rendered report text, ending with exactly one newline
pub fn print_rendered(rendered: &str) {
    if rendered.ends_with('\n') {
        print!("{}", rendered);
    } else {
        println!("{}", rendered);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::Parser;
    use std::fs;
    use sweep_service::ServiceError;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        sweep: SweepArgs,
    }

    fn parse(args: &[&str]) -> SweepArgs {
        let mut argv = vec!["simsweep"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).unwrap().sweep
    }

    #[test]
    fn test_no_flags_gives_defaults() {
        assert_eq!(parse(&[]).resolve().unwrap(), SweepConfig::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = parse(&[
            "-c",
            "cfgB",
            "-c",
            "cfgA",
            "-j",
            "8",
            "--trace-dir",
            "t",
            "--ext",
            ".champsimtrace",
            "--sim",
            "1000",
            "--last-match",
        ])
        .resolve()
        .unwrap();

        assert_eq!(config.configurations, vec!["cfgB", "cfgA"]);
        assert_eq!(config.workers, 8);
        assert_eq!(config.trace_dirs, vec![PathBuf::from("t")]);
        assert_eq!(config.trace_extensions, vec![".champsimtrace"]);
        assert_eq!(config.simulation_instructions, 1000);
        assert_eq!(config.warmup_instructions, 10_000_000);
        assert_eq!(config.metric_match, ExtractionPolicy::Last);
    }

    #[test]
    fn test_flags_override_config_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("sweep.yaml");
        fs::write(
            &path,
            "workers: 2\nsimulation_instructions: 5000\nconfigurations: [x, y]\n",
        )
        .unwrap();

        let path_arg = path.to_string_lossy().to_string();
        let config = parse(&["--config", &path_arg, "-j", "6"]).resolve().unwrap();

        assert_eq!(config.workers, 6);
        assert_eq!(config.simulation_instructions, 5000);
        assert_eq!(config.configurations, vec!["x", "y"]);
    }

    #[test]
    fn test_zero_jobs_rejected() {
        let err = parse(&["-j", "0"]).resolve().unwrap_err();
        assert!(matches!(err, ServiceError::InvalidConfig(_)));
    }
}

// Execution Models
// Jobs and their outcomes

use crate::discovery::trace_display_name;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// One simulator run: a configuration id paired with a trace
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Job {
    pub configuration: String,
    pub trace: PathBuf,
}

impl Job {
    pub fn new(configuration: impl Into<String>, trace: impl Into<PathBuf>) -> Self {
        Self {
            configuration: configuration.into(),
            trace: trace.into(),
        }
    }

    pub fn trace_path(&self) -> &Path {
        &self.trace
    }

    /// Report row name of the trace
    pub fn trace_name(&self) -> String {
        trace_display_name(&self.trace)
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.configuration, self.trace_name())
    }
}

/// Why a job produced no metric
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbsenceReason {
    /// The binary could not be started (missing, not executable, ...)
    #[error("failed to launch simulator: {0}")]
    LaunchFailed(String),

    /// The process ran but did not exit cleanly; `None` means killed by a signal
    #[error("simulator exited abnormally (exit code: {})", exit_code_label(.exit_code))]
    ExitFailure {
        exit_code: Option<i32>,
        stderr_tail: Option<String>,
    },

    /// The run succeeded but printed no IPC line
    #[error("no IPC figure found in simulator output")]
    MetricNotFound,
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

/// Result of executing one job.
///
/// An absent metric is a normal value here, never an error that aborts the sweep.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub job: Job,
    pub metric: Result<f64, AbsenceReason>,
    pub duration: Duration,
}

impl JobOutcome {
    pub fn new(job: Job, metric: Result<f64, AbsenceReason>, duration: Duration) -> Self {
        Self {
            job,
            metric,
            duration,
        }
    }

    /// The metric, with every absence reason collapsed to `None`
    pub fn value(&self) -> Option<f64> {
        self.metric.as_ref().ok().copied()
    }

    pub fn is_absent(&self) -> bool {
        self.metric.is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_display() {
        let job = Job::new("1C.fullBW.nopref", "traces/GAP/bfs.gz");
        assert_eq!(job.to_string(), "1C.fullBW.nopref on bfs.gz");
        assert_eq!(job.trace_name(), "bfs.gz");
        assert_eq!(job.trace_path(), Path::new("traces/GAP/bfs.gz"));
    }

    #[test]
    fn test_absence_reason_messages() {
        let exit = AbsenceReason::ExitFailure {
            exit_code: Some(3),
            stderr_tail: None,
        };
        assert_eq!(exit.to_string(), "simulator exited abnormally (exit code: 3)");

        let signal = AbsenceReason::ExitFailure {
            exit_code: None,
            stderr_tail: None,
        };
        assert!(signal.to_string().contains("signal"));

        let launch = AbsenceReason::LaunchFailed("No such file or directory".to_string());
        assert!(launch.to_string().contains("No such file"));
    }

    #[test]
    fn test_outcome_value() {
        let job = Job::new("cfgA", "t1.gz");
        let present = JobOutcome::new(job.clone(), Ok(1.5), Duration::ZERO);
        let absent = JobOutcome::new(job, Err(AbsenceReason::MetricNotFound), Duration::ZERO);

        assert_eq!(present.value(), Some(1.5));
        assert!(!present.is_absent());
        assert_eq!(absent.value(), None);
        assert!(absent.is_absent());
    }
}

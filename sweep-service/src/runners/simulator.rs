// Simulator Runner
// Invokes one simulator binary per job and captures its output

use crate::config::SweepConfig;
use crate::execution::models::{AbsenceReason, Job};
use crate::runners::JobRunner;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Output collected from one simulator process
#[derive(Debug, Clone, Default)]
pub struct SimulatorOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Exit code (`None` when terminated by a signal)
    pub exit_code: Option<i32>,
}

impl SimulatorOutput {
    /// Keep stdout for a clean exit, otherwise describe the failure
    pub fn into_stdout(self) -> Result<String, AbsenceReason> {
        match self.exit_code {
            Some(0) => Ok(self.stdout),
            exit_code => Err(AbsenceReason::ExitFailure {
                exit_code,
                stderr_tail: last_line(&self.stderr),
            }),
        }
    }
}

/// Runs `<binary_dir>/<configuration> --warmup-instructions N1
/// --simulation-instructions N2 <trace>`
#[derive(Debug, Clone)]
pub struct SimulatorRunner {
    binary_dir: PathBuf,
    warmup_instructions: u64,
    simulation_instructions: u64,
}

impl SimulatorRunner {
    pub fn new(
        binary_dir: impl Into<PathBuf>,
        warmup_instructions: u64,
        simulation_instructions: u64,
    ) -> Self {
        Self {
            binary_dir: binary_dir.into(),
            warmup_instructions,
            simulation_instructions,
        }
    }

    pub fn from_config(config: &SweepConfig) -> Self {
        Self::new(
            config.binary_dir.clone(),
            config.warmup_instructions,
            config.simulation_instructions,
        )
    }

    pub fn binary_dir(&self) -> &Path {
        &self.binary_dir
    }

    /// Program path for a job
    pub fn program(&self, job: &Job) -> PathBuf {
        self.binary_dir.join(&job.configuration)
    }

    /// Arguments passed after the program path
    pub fn args(&self, job: &Job) -> Vec<OsString> {
        vec![
            "--warmup-instructions".into(),
            self.warmup_instructions.to_string().into(),
            "--simulation-instructions".into(),
            self.simulation_instructions.to_string().into(),
            job.trace.clone().into_os_string(),
        ]
    }

    /// Printable form of the command, for dry runs and logs
    pub fn command_line(&self, job: &Job) -> String {
        let mut parts = vec![self.program(job).to_string_lossy().into_owned()];
        parts.extend(
            self.args(job)
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned()),
        );
        parts.join(" ")
    }

    /// Spawn the simulator and wait for it, capturing both streams.
    ///
    /// No timeout is applied: a hung simulator holds its worker until it exits.
    pub async fn execute(&self, job: &Job) -> Result<SimulatorOutput, AbsenceReason> {
        let program = self.program(job);

        let mut cmd = Command::new(&program);
        cmd.args(self.args(job));
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd.output().await.map_err(|e| {
            AbsenceReason::LaunchFailed(format!("{}: {}", program.display(), e))
        })?;

        Ok(SimulatorOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }
}

#[async_trait::async_trait]
impl JobRunner for SimulatorRunner {
    async fn run(&self, job: &Job) -> Result<String, AbsenceReason> {
        tracing::info!("Starting: {} on {}", job.configuration, job.trace_name());

        let result = self.execute(job).await.and_then(SimulatorOutput::into_stdout);

        if let Err(reason) = &result {
            match reason {
                AbsenceReason::ExitFailure {
                    stderr_tail: Some(tail),
                    ..
                } => tracing::warn!(
                    configuration = %job.configuration,
                    trace = %job.trace.display(),
                    stderr = %tail,
                    "{}",
                    reason
                ),
                _ => tracing::warn!(
                    configuration = %job.configuration,
                    trace = %job.trace.display(),
                    "{}",
                    reason
                ),
            }
        }

        result
    }
}

/// Last non-empty line of a stream, trimmed
fn last_line(text: &str) -> Option<String> {
    text.lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

// Runners Module
// Executes jobs as external processes

pub mod simulator;

pub use simulator::{SimulatorOutput, SimulatorRunner};

use crate::execution::models::{AbsenceReason, Job};

/// Trait for job runners
///
/// A runner owns everything about turning a [`Job`] into captured text.
/// Every failure is returned as an [`AbsenceReason`]; runners never panic
/// or abort the sweep.
#[async_trait::async_trait]
pub trait JobRunner: Send + Sync {
    /// Execute a job and return its standard output
    async fn run(&self, job: &Job) -> Result<String, AbsenceReason>;
}

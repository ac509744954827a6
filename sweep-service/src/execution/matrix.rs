// Job Matrix
// Expands configurations x traces into concrete jobs

use crate::execution::models::Job;

use std::path::PathBuf;

/// Builds the cartesian product of configurations and traces
pub struct JobMatrixBuilder;

impl JobMatrixBuilder {
    /// Expand into jobs, configurations as the outer loop and traces inner.
    ///
    /// The order only affects dispatch; outcomes are re-keyed by the report.
    pub fn expand(configurations: &[String], traces: &[PathBuf]) -> Vec<Job> {
        configurations
            .iter()
            .flat_map(|configuration| {
                traces
                    .iter()
                    .map(move |trace| Job::new(configuration.clone(), trace.clone()))
            })
            .collect()
    }

    /// Number of jobs `expand` would produce
    pub fn job_count(configurations: &[String], traces: &[PathBuf]) -> usize {
        configurations.len() * traces.len()
    }
}

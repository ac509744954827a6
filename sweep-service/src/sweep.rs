// Sweep Driver
// Discovery -> job matrix -> scheduler -> result table

use crate::config::SweepConfig;
use crate::discovery::{trace_display_name, TraceDiscovery};
use crate::error::ServiceResult;
use crate::execution::events::{EventSender, ProgressSender, SweepEvent};
use crate::execution::matrix::JobMatrixBuilder;
use crate::execution::models::{Job, JobOutcome};
use crate::execution::scheduler::SweepScheduler;
use crate::extract::MetricExtractor;
use crate::report::table::ResultTable;
use crate::runners::{JobRunner, SimulatorRunner};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Jobs a sweep would run, computed without running anything
#[derive(Debug, Clone)]
pub struct SweepPlan {
    pub traces: Vec<PathBuf>,
    pub jobs: Vec<Job>,
}

impl SweepPlan {
    /// Row names of the report, in discovery order
    pub fn trace_names(&self) -> Vec<String> {
        self.traces.iter().map(|t| trace_display_name(t)).collect()
    }
}

/// Everything a finished sweep produced
#[derive(Debug, Clone)]
pub struct SweepReport {
    pub table: ResultTable,
    pub outcomes: Vec<JobOutcome>,
    pub traces: Vec<PathBuf>,
    pub duration: Duration,
}

impl SweepReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_absent()).count()
    }

    pub fn absent(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_absent()).count()
    }
}

/// One configured sweep
pub struct Sweep {
    config: SweepConfig,
    runner: Arc<dyn JobRunner>,
    event_tx: Option<ProgressSender>,
}

impl Sweep {
    /// Create a sweep that runs the simulator binaries named by `config`
    pub fn new(config: SweepConfig) -> ServiceResult<Self> {
        config.validate()?;
        let runner = Arc::new(SimulatorRunner::from_config(&config));
        Ok(Self {
            config,
            runner,
            event_tx: None,
        })
    }

    /// Replace the process runner
    pub fn with_runner(mut self, runner: Arc<dyn JobRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Set progress event sender
    pub fn with_progress(mut self, tx: ProgressSender) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Discover traces and expand the job matrix
    pub fn plan(&self) -> SweepPlan {
        let traces =
            TraceDiscovery::new(&self.config.trace_dirs, &self.config.trace_extensions).discover();
        let jobs = JobMatrixBuilder::expand(&self.config.configurations, &traces);
        SweepPlan { traces, jobs }
    }

    /// Run every job and build the result table.
    ///
    /// Never fails: jobs that crash or print nothing usable become `N/A` cells.
    pub async fn run(&self) -> SweepReport {
        let start = Instant::now();
        let SweepPlan { traces, jobs } = self.plan();
        tracing::info!("Found {} traces.", traces.len());

        let scheduler = self.scheduler();
        let total_jobs = jobs.len();
        let workers = scheduler.effective_workers(total_jobs);
        tracing::info!(
            "Running {} simulations with {} workers...",
            total_jobs,
            workers
        );
        self.event_tx.send_event(SweepEvent::sweep_started(
            traces.len(),
            self.config.configurations.len(),
            total_jobs,
            workers,
        ));

        let outcomes = scheduler.run(jobs).await;

        let trace_names: Vec<String> = traces.iter().map(|t| trace_display_name(t)).collect();
        let table = ResultTable::aggregate(&outcomes, &self.config.configurations, &trace_names);

        let report = SweepReport {
            table,
            outcomes,
            traces,
            duration: start.elapsed(),
        };

        tracing::info!(
            succeeded = report.succeeded(),
            absent = report.absent(),
            "sweep finished in {:.2}s",
            report.duration.as_secs_f64()
        );
        self.event_tx.send_event(SweepEvent::sweep_completed(
            report.succeeded(),
            report.absent(),
            report.duration,
        ));

        report
    }

    /// Run the sweep and write the result record to the configured output path
    pub async fn run_and_save(&self) -> ServiceResult<SweepReport> {
        let report = self.run().await;
        report.table.save(&self.config.output)?;
        tracing::info!("Results saved to {}", self.config.output.display());
        Ok(report)
    }

    fn scheduler(&self) -> SweepScheduler {
        let mut scheduler = SweepScheduler::new(Arc::clone(&self.runner))
            .with_workers(self.config.workers)
            .with_extractor(MetricExtractor::new(self.config.metric_match));
        if let Some(tx) = &self.event_tx {
            scheduler = scheduler.with_progress(tx.clone());
        }
        scheduler
    }
}

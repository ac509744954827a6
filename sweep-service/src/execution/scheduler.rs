// Sweep Scheduler
// Runs the job matrix on a fixed pool of workers

use crate::execution::events::{EventSender, ProgressSender, SweepEvent};
use crate::execution::models::{AbsenceReason, Job, JobOutcome};
use crate::extract::MetricExtractor;
use crate::runners::JobRunner;

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};

/// Default number of concurrent simulator processes
pub const DEFAULT_WORKERS: usize = 4;

/// Dispatches jobs to at most `workers` concurrent runs.
///
/// Jobs flow through a bounded queue shared by the workers; every worker
/// pushes one [`JobOutcome`] per job into a results channel. Outcomes come
/// back in completion order, not submission order.
pub struct SweepScheduler {
    runner: Arc<dyn JobRunner>,
    extractor: MetricExtractor,
    workers: usize,
    event_tx: Option<ProgressSender>,
}

impl SweepScheduler {
    pub fn new(runner: Arc<dyn JobRunner>) -> Self {
        Self {
            runner,
            extractor: MetricExtractor::default(),
            workers: DEFAULT_WORKERS,
            event_tx: None,
        }
    }

    /// Set the pool size; zero is treated as one
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_extractor(mut self, extractor: MetricExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Set progress event sender
    pub fn with_progress(mut self, tx: ProgressSender) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Number of workers actually spawned for `job_count` jobs
    pub fn effective_workers(&self, job_count: usize) -> usize {
        self.workers.min(job_count).max(1)
    }

    /// Run every job and wait for all of them.
    ///
    /// Returns exactly one outcome per job. Individual failures show up as
    /// absent metrics; nothing here aborts the sweep.
    pub async fn run(&self, jobs: Vec<Job>) -> Vec<JobOutcome> {
        if jobs.is_empty() {
            return Vec::new();
        }

        let total = jobs.len();
        let workers = self.effective_workers(total);
        tracing::debug!(jobs = total, workers, "dispatching sweep");

        let (job_tx, job_rx) = mpsc::channel::<Job>(workers);
        let job_rx = Arc::new(Mutex::new(job_rx));
        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<JobOutcome>();

        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let job_rx = Arc::clone(&job_rx);
            let outcome_tx = outcome_tx.clone();
            let runner = Arc::clone(&self.runner);
            let extractor = self.extractor;
            let event_tx = self.event_tx.clone();

            handles.push(tokio::spawn(async move {
                loop {
                    // Hold the lock only while waiting for the next job
                    let next = job_rx.lock().await.recv().await;
                    let Some(job) = next else { break };

                    let outcome = evaluate_job(job, &*runner, extractor, &event_tx).await;
                    if outcome_tx.send(outcome).is_err() {
                        break;
                    }
                }
                tracing::trace!(worker_id, "worker finished");
            }));
        }
        drop(outcome_tx);

        for job in jobs {
            if job_tx.send(job).await.is_err() {
                tracing::error!("all sweep workers exited early");
                break;
            }
        }
        drop(job_tx);

        let mut outcomes = Vec::with_capacity(total);
        while let Some(outcome) = outcome_rx.recv().await {
            outcomes.push(outcome);
        }

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "sweep worker panicked");
            }
        }

        if outcomes.len() != total {
            tracing::error!(
                expected = total,
                received = outcomes.len(),
                "some jobs produced no outcome"
            );
        }

        outcomes
    }
}

/// Execute one job and reduce it to an outcome
async fn evaluate_job(
    job: Job,
    runner: &dyn JobRunner,
    extractor: MetricExtractor,
    event_tx: &Option<ProgressSender>,
) -> JobOutcome {
    let start = Instant::now();
    event_tx.send_event(SweepEvent::job_started(&job.configuration, job.trace_name()));

    let metric = match runner.run(&job).await {
        Ok(stdout) => extractor.extract(&stdout).ok_or_else(|| {
            tracing::warn!(
                configuration = %job.configuration,
                trace = %job.trace.display(),
                "Error parsing output: no IPC figure found"
            );
            AbsenceReason::MetricNotFound
        }),
        Err(reason) => Err(reason),
    };

    let duration = start.elapsed();
    event_tx.send_event(SweepEvent::job_finished(
        &job.configuration,
        job.trace_name(),
        metric.as_ref().ok().copied(),
        metric.as_ref().err().map(ToString::to_string),
        duration,
    ));

    JobOutcome::new(job, metric, duration)
}

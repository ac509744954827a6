// Sweep Events
// Progress reporting for a running sweep

use std::time::Duration;
use tokio::sync::mpsc;

/// Sender for sweep progress events
pub type ProgressSender = mpsc::UnboundedSender<SweepEvent>;

/// Receiver for sweep progress events
pub type ProgressReceiver = mpsc::UnboundedReceiver<SweepEvent>;

/// Create a new progress channel
pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    mpsc::unbounded_channel()
}

/// Events emitted while a sweep runs
#[derive(Debug, Clone, PartialEq)]
pub enum SweepEvent {
    /// Traces discovered and matrix built; jobs about to be dispatched
    SweepStarted {
        traces: usize,
        configurations: usize,
        total_jobs: usize,
        workers: usize,
    },

    /// A worker picked up a job
    JobStarted { configuration: String, trace: String },

    /// A job finished; `metric` is `None` when the run produced no figure
    JobFinished {
        configuration: String,
        trace: String,
        metric: Option<f64>,
        reason: Option<String>,
        duration: Duration,
    },

    /// Every job has an outcome
    SweepCompleted {
        succeeded: usize,
        absent: usize,
        duration: Duration,
    },
}

impl SweepEvent {
    pub fn sweep_started(
        traces: usize,
        configurations: usize,
        total_jobs: usize,
        workers: usize,
    ) -> Self {
        Self::SweepStarted {
            traces,
            configurations,
            total_jobs,
            workers,
        }
    }

    pub fn job_started(configuration: impl Into<String>, trace: impl Into<String>) -> Self {
        Self::JobStarted {
            configuration: configuration.into(),
            trace: trace.into(),
        }
    }

    pub fn job_finished(
        configuration: impl Into<String>,
        trace: impl Into<String>,
        metric: Option<f64>,
        reason: Option<String>,
        duration: Duration,
    ) -> Self {
        Self::JobFinished {
            configuration: configuration.into(),
            trace: trace.into(),
            metric,
            reason,
            duration,
        }
    }

    pub fn sweep_completed(succeeded: usize, absent: usize, duration: Duration) -> Self {
        Self::SweepCompleted {
            succeeded,
            absent,
            duration,
        }
    }
}

/// Helper trait for sending events, ignoring errors (fire-and-forget)
pub trait EventSender {
    fn send_event(&self, event: SweepEvent);
}

impl EventSender for ProgressSender {
    fn send_event(&self, event: SweepEvent) {
        let _ = self.send(event);
    }
}

impl EventSender for Option<ProgressSender> {
    fn send_event(&self, event: SweepEvent) {
        if let Some(sender) = self {
            let _ = sender.send(event);
        }
    }
}

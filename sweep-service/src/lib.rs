// Sweep Service Library
// Runs simulator binaries over a configuration x trace matrix and aggregates IPC results

pub mod config;
pub mod discovery;
pub mod error;
pub mod execution;
pub mod extract;
pub mod report;
pub mod runners;
pub mod sweep;

// Re-export commonly used types
pub use error::{ServiceError, ServiceResult};

pub use config::SweepConfig;
pub use discovery::{trace_display_name, TraceDiscovery};
pub use extract::{ExtractionPolicy, MetricExtractor};
pub use sweep::{Sweep, SweepPlan, SweepReport};

// Re-export execution types
pub use execution::{
    progress_channel, AbsenceReason, Job, JobMatrixBuilder, JobOutcome, ProgressSender,
    SweepEvent, SweepScheduler,
};

// Re-export runner types
pub use runners::{JobRunner, SimulatorRunner};

// Re-export report types
pub use report::{ReportFormat, ResultReporter, ResultTable, TableLayout};

// Execution Engine Module
// Handles matrix expansion, job outcomes and bounded-concurrency scheduling

pub mod events;
pub mod matrix;
pub mod models;
pub mod scheduler;

// Re-export key types
pub use events::{progress_channel, EventSender, ProgressReceiver, ProgressSender, SweepEvent};
pub use matrix::JobMatrixBuilder;
pub use models::{AbsenceReason, Job, JobOutcome};
pub use scheduler::{SweepScheduler, DEFAULT_WORKERS};

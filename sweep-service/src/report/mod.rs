// Report Module
// Aggregates job outcomes into a result table and renders or persists it

pub mod reporter;
pub mod table;

// Re-export key types
pub use reporter::{format_metric, ReportFormat, ResultReporter, TableLayout, ABSENT_MARKER};
pub use table::ResultTable;

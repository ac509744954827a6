// Service Errors
// Fatal errors raised outside the per-job path (config and report I/O)

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a sweep before it starts or after it finishes.
///
/// Per-job failures never surface here; they are recorded as
/// [`AbsenceReason`](crate::execution::AbsenceReason) values instead.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid sweep configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read report {path}: {source}")]
    ReportRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed report {path}: {source}")]
    ReportParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write report {path}: {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

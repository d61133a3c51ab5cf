//! Error types for probe execution, alert delivery and the record log.

use std::path::PathBuf;
use thiserror::Error;

/// A single probe run failed.
///
/// Probe failures are never fatal: they only raise badness and produce a
/// failing record.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProbeError {
    /// The check ran and the target did not look the way it should.
    #[error("{0}")]
    Check(String),

    /// The check did not complete before the probe interval elapsed.
    #[error("{name} timed out (with probe interval {interval_secs:.1} sec)")]
    TimedOut { name: String, interval_secs: f64 },

    /// The probe task panicked.
    #[error("{0} panicked")]
    Panicked(String),
}

impl ProbeError {
    /// Convenience constructor for check failures.
    pub fn check(msg: impl Into<String>) -> Self {
        Self::Check(msg.into())
    }
}

/// Delivering an alert failed. The next alerting cycle retries.
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("alert delivery failed: {0}")]
    Delivery(String),

    #[error("alert endpoint returned status {0}")]
    Status(u16),
}

/// Errors from the durable record log.
///
/// Any of these is fatal to the process.
#[derive(Debug, Error)]
pub enum RecordLogError {
    #[error("failed to open record log {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write record log: {0}")]
    Write(#[from] std::io::Error),

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Reasons a probe runner stops with an error.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("probe {probe}: {source}")]
    RecordLog {
        probe: String,
        #[source]
        source: RecordLogError,
    },
}

//! Durable, append-only record log shared by all probes.
//!
//! # Responsibilities
//! - Open the outcome log once during startup
//! - Append one JSON document per line for every probe cycle
//!
//! # Design Decisions
//! - The file is opened in append mode and each record is written with a
//!   single `write_all`, so concurrent probes need no extra locking
//! - Write failures are returned to the caller, which treats them as fatal
//! - The handle is closed when the last `Arc<RecordLog>` is dropped

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::probe::error::RecordLogError;
use crate::records::record::Record;

/// File name used when no log path is configured.
pub const DEFAULT_LOG_NAME: &str = "prober.outcomes.log";

/// Default location of the record log (the system temp directory).
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_LOG_NAME)
}

/// Process-wide append-only outcome log.
#[derive(Debug)]
pub struct RecordLog {
    path: PathBuf,
    file: File,
}

impl RecordLog {
    /// Open (or create) the log at `path` for appending.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RecordLogError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| RecordLogError::Open {
                path: path.clone(),
                source,
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| RecordLogError::Open {
                path: path.clone(),
                source,
            })?;

        tracing::info!(path = %path.display(), "Record log opened");
        Ok(Self { path, file })
    }

    /// Append a serialized copy of `record`.
    pub fn append(&self, record: &Record) -> Result<(), RecordLogError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        (&self.file).write_all(&line)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    #[test]
    fn test_append_writes_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outcomes.log");
        let log = RecordLog::open(&path).unwrap();

        let ts = Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap();
        log.append(&Record::pass(ts)).unwrap();
        log.append(&Record::fail(ts, "connection refused")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let second: Record = serde_json::from_str(lines[1]).unwrap();
        assert!(!second.passed);
        assert_eq!(second.details, "connection refused");
        assert_eq!(second.timestamp, ts);
    }

    #[test]
    fn test_reopen_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("outcomes.log");
        let ts = Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap();

        RecordLog::open(&path).unwrap().append(&Record::pass(ts)).unwrap();
        RecordLog::open(&path).unwrap().append(&Record::pass(ts)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_shared_across_threads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outcomes.log");
        let log = Arc::new(RecordLog::open(&path).unwrap());
        let ts = Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let log = log.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        log.append(&Record::fail(ts, format!("writer {i}"))).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 100);
        for line in content.lines() {
            serde_json::from_str::<Record>(line).unwrap();
        }
    }

    #[test]
    fn test_open_failure_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as the log file.
        let err = RecordLog::open(dir.path()).unwrap_err();
        assert!(matches!(err, RecordLogError::Open { .. }));
        assert!(err.to_string().contains(&dir.path().display().to_string()));
    }
}

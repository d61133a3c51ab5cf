//! Probe outcome records.
//!
//! # Data Flow
//! ```text
//! Probe cycle finishes
//!     → record.rs (Record: timestamp, passed, details)
//!     → history.rs (bounded per-probe Records, FIFO eviction)
//!     → log.rs (shared append-only JSON-lines file)
//!
//! Readers (status API, alerts):
//!     → Records::recent_failures (failures from the last hour, newest first)
//! ```
//!
//! # Design Decisions
//! - Records are immutable once created
//! - In-memory history is bounded; the durable log is not
//! - The log file is opened once at startup and shared by every probe

pub mod history;
pub mod log;
pub mod record;

pub use history::{Records, DEFAULT_CAPACITY};
pub use log::RecordLog;
pub use record::{describe_duration, Record};

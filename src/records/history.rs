//! Bounded per-probe record history.
//!
//! # Responsibilities
//! - Keep the most recent records of one probe, oldest first
//! - Evict from the front once capacity is exceeded
//! - Derive the "recent failures" view used by alerts and the status API

use std::collections::VecDeque;

use chrono::{DateTime, TimeDelta, Utc};

use crate::records::record::Record;

/// Default maximum number of records kept per probe.
pub const DEFAULT_CAPACITY: usize = 200;

/// Failures older than this many seconds are not considered recent.
const RECENT_WINDOW_SECS: i64 = 3600;

/// Chronological, bounded sequence of records.
#[derive(Debug, Clone)]
pub struct Records {
    entries: VecDeque<Record>,
    capacity: usize,
}

impl Records {
    /// Create an empty history holding at most `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity,
        }
    }

    /// Append a record, evicting the oldest entries if over capacity.
    pub fn push(&mut self, record: Record) {
        self.entries.push_back(record);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent record, if any.
    pub fn last(&self) -> Option<&Record> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<Record> {
        self.entries.iter().cloned().collect()
    }

    /// Failures within the last hour before `now`, most recent first.
    pub fn recent_failures(&self, now: DateTime<Utc>) -> Vec<Record> {
        let cutoff = now - TimeDelta::seconds(RECENT_WINDOW_SECS);
        let mut failures: Vec<Record> = self
            .entries
            .iter()
            .filter(|r| !r.passed && r.timestamp >= cutoff)
            .cloned()
            .collect();
        failures.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        failures
    }
}

impl Default for Records {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

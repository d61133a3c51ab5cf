//! Per-probe settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::records::DEFAULT_CAPACITY;
use crate::scoring::BadnessPolicy;

/// Pause between probe runs when nothing else is configured.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(61);

/// What happens to a probe call that is still running when its interval
/// deadline passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrunPolicy {
    /// Leave the call running in the background; its result is ignored.
    #[default]
    Abandon,
    /// Cancel the call at the deadline.
    Abort,
}

/// Static description of one probe.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub name: String,
    pub description: String,
    /// Deadline for a single run; a run that outlives it is a failure.
    pub interval: Duration,
    /// Pacing after a completed run: the next run starts `timeout` after
    /// the previous one started. Defaults to `interval`.
    pub timeout: Duration,
    pub badness: BadnessPolicy,
    /// Maximum number of records kept in memory.
    pub capacity: usize,
    pub overrun: OverrunPolicy,
}

impl ProbeSettings {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            interval: DEFAULT_INTERVAL,
            timeout: DEFAULT_INTERVAL,
            badness: BadnessPolicy::default(),
            capacity: DEFAULT_CAPACITY,
            overrun: OverrunPolicy::default(),
        }
    }

    /// Set the interval. A timeout that still equals the old interval
    /// follows it; an explicitly different timeout is kept.
    pub fn interval(mut self, interval: Duration) -> Self {
        if self.timeout == self.interval {
            self.timeout = interval;
        }
        self.interval = interval;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Badness added on every failure.
    pub fn failure_penalty(mut self, increment: i64) -> Self {
        self.badness.increment = increment;
        self
    }

    /// Badness removed on every success.
    pub fn success_reward(mut self, decrement: i64) -> Self {
        self.badness.decrement = decrement;
        self
    }

    pub fn min_badness(mut self, floor: i64) -> Self {
        self.badness.floor = floor;
        self
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn overrun(mut self, overrun: OverrunPolicy) -> Self {
        self.overrun = overrun;
        self
    }
}

//! Alert throttling.
//!
//! # Responsibilities
//! - Decide whether an alerting probe may dispatch right now
//! - Accept or reject a successful delivery (compare-and-reset)
//!
//! # Design Decisions
//! - `last_alert` only moves when a delivery is accepted, so a failed
//!   delivery is retried on the next alerting cycle
//! - Overlapping deliveries are allowed; only one of them is accepted per
//!   `max_frequency` window

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Never accept alerts more often than this by default.
pub const DEFAULT_MAX_ALERT_FREQUENCY: Duration = Duration::from_secs(15 * 60);

/// Default badness level at which a probe is alerting.
pub const DEFAULT_ALERT_THRESHOLD: i64 = 100;

/// Process-wide alerting settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertPolicy {
    pub threshold: i64,
    pub max_frequency: Duration,
    /// Global mute: probes still report alerting, nothing is dispatched.
    pub disabled: bool,
}

impl AlertPolicy {
    pub fn is_alerting(&self, badness: i64) -> bool {
        badness >= self.threshold
    }
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_ALERT_THRESHOLD,
            max_frequency: DEFAULT_MAX_ALERT_FREQUENCY,
            disabled: false,
        }
    }
}

/// Outcome of consulting the throttle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// Launch a delivery.
    Dispatch,
    /// The last accepted alert is too recent.
    Suppress { since_last: Duration },
}

/// Minimum spacing between accepted alerts of one probe.
#[derive(Debug, Clone)]
pub struct AlertThrottle {
    max_frequency: Duration,
    last_alert: Option<DateTime<Utc>>,
}

impl AlertThrottle {
    pub fn new(max_frequency: Duration) -> Self {
        Self {
            max_frequency,
            last_alert: None,
        }
    }

    /// Whether a new delivery may be launched at `now`.
    pub fn check(&self, now: DateTime<Utc>) -> ThrottleDecision {
        match self.since_last(now) {
            Some(since_last) if since_last < self.max_frequency => {
                ThrottleDecision::Suppress { since_last }
            }
            _ => ThrottleDecision::Dispatch,
        }
    }

    /// Record a successful delivery completed at `now`.
    ///
    /// Returns `false` when another delivery was already accepted within
    /// `max_frequency`; the caller must then leave its state untouched.
    pub fn accept(&mut self, now: DateTime<Utc>) -> bool {
        if let ThrottleDecision::Suppress { .. } = self.check(now) {
            return false;
        }
        self.last_alert = Some(now);
        true
    }

    pub fn last_alert(&self) -> Option<DateTime<Utc>> {
        self.last_alert
    }

    pub fn max_frequency(&self) -> Duration {
        self.max_frequency
    }

    fn since_last(&self, now: DateTime<Utc>) -> Option<Duration> {
        // A clock that stepped backwards counts as "just now".
        self.last_alert
            .map(|last| (now - last).to_std().unwrap_or(Duration::ZERO))
    }
}

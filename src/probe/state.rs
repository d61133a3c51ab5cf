//! Shared, observable state of one probe.
//!
//! # Responsibilities
//! - Hold badness, alerting, disabled flag, last alert and record history
//! - Apply one cycle's outcome atomically and decide the alert action
//! - Apply compare-and-reset when an alert delivery succeeds
//! - Hand out snapshots to readers (status API) at any time
//!
//! # Design Decisions
//! - One `Mutex` per probe, held only for short synchronous sections
//! - Written by the probe's own runner and by the alert deliveries it spawned
//! - A poisoned lock is recovered rather than propagated: the state is
//!   plain data and stays consistent between sections

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::alert::AlertEvent;
use crate::probe::error::ProbeError;
use crate::probe::settings::ProbeSettings;
use crate::records::{Record, Records};
use crate::scoring::{AlertPolicy, AlertThrottle, BadnessAccumulator, ThrottleDecision};

/// What a cycle decided about alerting.
#[derive(Debug, Clone)]
pub enum AlertAction {
    /// Below threshold.
    Clear,
    /// Alerting, but alerts are globally disabled.
    Muted,
    /// Alerting, but the last accepted alert is too recent.
    Suppressed { since_last: Duration },
    /// Alerting and a delivery should be launched.
    Dispatch(AlertEvent),
}

/// Result of applying one probe outcome.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub record: Record,
    pub badness: i64,
    pub alerting: bool,
    pub alert: AlertAction,
}

#[derive(Debug)]
struct ProbeState {
    badness: BadnessAccumulator,
    alerting: bool,
    disabled: bool,
    throttle: AlertThrottle,
    records: Records,
    runs: u64,
}

/// Point-in-time view of a probe for readers.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeSnapshot {
    pub name: String,
    pub description: String,
    pub interval_secs: f64,
    pub timeout_secs: f64,
    pub badness: i64,
    pub alerting: bool,
    pub disabled: bool,
    pub last_alert: Option<DateTime<Utc>>,
    pub alerts_in_flight: usize,
    pub runs: u64,
    pub last_record: Option<Record>,
}

/// Snapshot with the full history (newest first) and recent failures.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeDetail {
    #[serde(flatten)]
    pub snapshot: ProbeSnapshot,
    pub records: Vec<Record>,
    pub recent_failures: Vec<Record>,
}

/// A long-lived probe shared between its runner, its alert deliveries and
/// readers.
#[derive(Debug)]
pub struct ProbeHandle {
    settings: ProbeSettings,
    policy: AlertPolicy,
    state: Mutex<ProbeState>,
    alerts_in_flight: AtomicUsize,
}

impl ProbeHandle {
    pub fn new(settings: ProbeSettings, policy: AlertPolicy) -> Self {
        let state = ProbeState {
            badness: BadnessAccumulator::new(settings.badness),
            alerting: false,
            disabled: false,
            throttle: AlertThrottle::new(policy.max_frequency),
            records: Records::with_capacity(settings.capacity),
            runs: 0,
        };
        Self {
            settings,
            policy,
            state: Mutex::new(state),
            alerts_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.settings.name
    }

    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    pub fn policy(&self) -> &AlertPolicy {
        &self.policy
    }

    fn lock(&self) -> MutexGuard<'_, ProbeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Route one run's outcome through badness, history and the throttle.
    ///
    /// `started` is when the run began, `now` is when it was handled.
    pub fn apply_outcome(
        &self,
        started: DateTime<Utc>,
        outcome: &Result<(), ProbeError>,
        now: DateTime<Utc>,
    ) -> CycleOutcome {
        let mut state = self.lock();

        let record = match outcome {
            Ok(()) => Record::pass(started),
            Err(e) => Record::fail(started, e.to_string()),
        };
        let badness = state.badness.record(outcome.is_ok());
        state.records.push(record.clone());
        state.runs += 1;

        let alerting = self.policy.is_alerting(badness);
        state.alerting = alerting;

        let alert = if !alerting {
            AlertAction::Clear
        } else if self.policy.disabled {
            AlertAction::Muted
        } else {
            match state.throttle.check(now) {
                ThrottleDecision::Suppress { since_last } => AlertAction::Suppressed { since_last },
                ThrottleDecision::Dispatch => AlertAction::Dispatch(AlertEvent::new(
                    &self.settings.name,
                    &self.settings.description,
                    badness,
                    state.records.recent_failures(now),
                    now,
                )),
            }
        };

        CycleOutcome {
            record,
            badness,
            alerting,
            alert,
        }
    }

    /// Compare-and-reset after a successful delivery at `now`.
    ///
    /// Returns `false` if another delivery was accepted within the
    /// throttle window, in which case nothing changes.
    pub fn complete_alert(&self, now: DateTime<Utc>) -> bool {
        let mut state = self.lock();
        if !state.throttle.accept(now) {
            return false;
        }
        state.badness.reset();
        true
    }

    pub(crate) fn alert_started(&self) {
        self.alerts_in_flight.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn alert_finished(&self) {
        self.alerts_in_flight.fetch_sub(1, Ordering::Relaxed);
    }

    /// One-way transition; a disabled probe never runs again.
    pub fn mark_disabled(&self) {
        self.lock().disabled = true;
    }

    pub fn is_disabled(&self) -> bool {
        self.lock().disabled
    }

    pub fn badness(&self) -> i64 {
        self.lock().badness.badness()
    }

    pub fn is_alerting(&self) -> bool {
        self.lock().alerting
    }

    pub fn last_alert(&self) -> Option<DateTime<Utc>> {
        self.lock().throttle.last_alert()
    }

    pub fn records(&self) -> Vec<Record> {
        self.lock().records.to_vec()
    }

    pub fn recent_failures(&self, now: DateTime<Utc>) -> Vec<Record> {
        self.lock().records.recent_failures(now)
    }

    pub fn snapshot(&self) -> ProbeSnapshot {
        let state = self.lock();
        self.snapshot_of(&state)
    }

    /// Snapshot plus history, all taken under one lock.
    pub fn detail(&self, now: DateTime<Utc>) -> ProbeDetail {
        let state = self.lock();
        let mut records = state.records.to_vec();
        records.reverse();
        ProbeDetail {
            snapshot: self.snapshot_of(&state),
            records,
            recent_failures: state.records.recent_failures(now),
        }
    }

    fn snapshot_of(&self, state: &ProbeState) -> ProbeSnapshot {
        ProbeSnapshot {
            name: self.settings.name.clone(),
            description: self.settings.description.clone(),
            interval_secs: self.settings.interval.as_secs_f64(),
            timeout_secs: self.settings.timeout.as_secs_f64(),
            badness: state.badness.badness(),
            alerting: state.alerting,
            disabled: state.disabled,
            last_alert: state.throttle.last_alert(),
            alerts_in_flight: self.alerts_in_flight.load(Ordering::Relaxed),
            runs: state.runs,
            last_record: state.records.last().cloned(),
        }
    }
}

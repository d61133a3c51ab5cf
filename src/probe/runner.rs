//! Probe runner: one probe's repeating lifecycle.
//!
//! # States
//! ```text
//! Enabled-Running ──(filter rejects name)──▶ Disabled-Terminated
//! ```
//!
//! # One Cycle
//! ```text
//! spawn Prober::probe ──┬─ completes first → handle result → sleep(timeout - elapsed)
//!                       └─ interval first  → synthetic timeout failure → next cycle
//! ```
//!
//! # Design Decisions
//! - The race deadline is `interval`, the pacing sleep uses `timeout`
//! - An overrun call is abandoned (default) or aborted, per `OverrunPolicy`
//! - Alert deliveries are detached tasks; several may be in flight
//! - Only record log failures end a runner with an error

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use crate::alert::AlertEvent;
use crate::observability::metrics;
use crate::probe::capability::{Alerter, Prober};
use crate::probe::enablement::EnablementFilter;
use crate::probe::error::{ProbeError, RunnerError};
use crate::probe::settings::OverrunPolicy;
use crate::probe::state::{AlertAction, ProbeHandle};
use crate::records::RecordLog;

/// Drives one probe until it is disabled or shutdown is signalled.
pub struct ProbeRunner {
    probe: Arc<ProbeHandle>,
    prober: Arc<dyn Prober>,
    alerter: Arc<dyn Alerter>,
    filter: Arc<dyn EnablementFilter>,
    log: Arc<RecordLog>,
}

impl ProbeRunner {
    pub fn new(
        probe: Arc<ProbeHandle>,
        prober: Arc<dyn Prober>,
        alerter: Arc<dyn Alerter>,
        filter: Arc<dyn EnablementFilter>,
        log: Arc<RecordLog>,
    ) -> Self {
        Self {
            probe,
            prober,
            alerter,
            filter,
            log,
        }
    }

    pub fn probe(&self) -> &Arc<ProbeHandle> {
        &self.probe
    }

    /// Run cycles until the filter disables the probe or shutdown fires.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> Result<(), RunnerError> {
        let name = self.probe.name().to_string();
        tracing::info!(probe = %name, "Starting probe");

        loop {
            if !self.filter.is_enabled(&name) {
                self.probe.mark_disabled();
                metrics::record_disabled(&name);
                tracing::info!(probe = %name, "Probe is disabled, exiting");
                return Ok(());
            }

            tokio::select! {
                result = self.run_once() => result?,
                _ = shutdown.recv() => {
                    tracing::info!(probe = %name, "Probe received shutdown signal, exiting loop");
                    return Ok(());
                }
            }
        }
    }

    /// Execute one cycle, including the pacing sleep after a completed run.
    pub async fn run_once(&self) -> Result<(), RunnerError> {
        let settings = self.probe.settings();
        let name = settings.name.clone();
        let started = Utc::now();
        let clock = Instant::now();

        let prober = self.prober.clone();
        let probe_name = name.clone();
        let mut task = tokio::spawn(async move {
            tracing::debug!(probe = %probe_name, "Probing");
            prober.probe().await
        });

        let finished = tokio::select! {
            joined = &mut task => Some(joined),
            _ = time::sleep(settings.interval) => None,
        };

        match finished {
            Some(joined) => {
                let outcome = match joined {
                    Ok(outcome) => outcome,
                    Err(e) if e.is_panic() => Err(ProbeError::Panicked(name.clone())),
                    Err(e) => Err(ProbeError::check(format!("{name} probe task failed: {e}"))),
                };
                metrics::record_probe_duration(&name, clock.elapsed());
                self.handle_result(started, outcome)?;

                let wait = settings.timeout.saturating_sub(clock.elapsed());
                tracing::trace!(probe = %name, wait = ?wait, "Sleeping before next run");
                time::sleep(wait).await;
            }
            None => {
                tracing::error!(probe = %name, "Timed out");
                if settings.overrun == OverrunPolicy::Abort {
                    task.abort();
                }
                metrics::record_probe_duration(&name, clock.elapsed());
                self.handle_result(
                    started,
                    Err(ProbeError::TimedOut {
                        name: name.clone(),
                        interval_secs: settings.interval.as_secs_f64(),
                    }),
                )?;
            }
        }
        Ok(())
    }

    /// Route a run's outcome and launch an alert delivery if one is due.
    ///
    /// Returns the handle of the launched delivery, if any. The cycle never
    /// waits on it.
    pub(crate) fn handle_result(
        &self,
        started: chrono::DateTime<Utc>,
        outcome: Result<(), ProbeError>,
    ) -> Result<Option<JoinHandle<bool>>, RunnerError> {
        let name = self.probe.name();
        let cycle = self.probe.apply_outcome(started, &outcome, Utc::now());

        match &outcome {
            Ok(()) => tracing::info!(probe = %name, badness = cycle.badness, "Pass"),
            Err(e) => tracing::error!(
                probe = %name,
                badness = cycle.badness,
                error = %e,
                "Failed while probing"
            ),
        }
        metrics::record_run(name, outcome.is_ok(), cycle.badness, cycle.alerting);

        self.log
            .append(&cycle.record)
            .map_err(|source| RunnerError::RecordLog {
                probe: name.to_string(),
                source,
            })?;

        let handle = match cycle.alert {
            AlertAction::Clear => None,
            AlertAction::Muted => {
                tracing::info!(probe = %name, "Would now be alerting, but alerts are suppressed");
                metrics::record_alert(name, "muted");
                None
            }
            AlertAction::Suppressed { since_last } => {
                tracing::debug!(
                    probe = %name,
                    since_last = ?since_last,
                    "Will not alert, last alert was sent too recently"
                );
                metrics::record_alert(name, "suppressed");
                None
            }
            AlertAction::Dispatch(event) => {
                tracing::info!(probe = %name, alert_id = %event.id, "Is alerting");
                Some(self.spawn_alert(event))
            }
        };
        Ok(handle)
    }

    fn spawn_alert(&self, event: AlertEvent) -> JoinHandle<bool> {
        let probe = self.probe.clone();
        let alerter = self.alerter.clone();
        probe.alert_started();
        tokio::spawn(deliver_alert(probe, alerter, event))
    }
}

/// Attempt one delivery and apply compare-and-reset on success.
///
/// Returns whether the delivery was accepted.
async fn deliver_alert(probe: Arc<ProbeHandle>, alerter: Arc<dyn Alerter>, event: AlertEvent) -> bool {
    let result = alerter.alert(&event).await;
    probe.alert_finished();

    match result {
        Ok(()) => {
            if probe.complete_alert(Utc::now()) {
                tracing::info!(
                    probe = %event.name,
                    alert_id = %event.id,
                    "Sent alert, resetting badness"
                );
                metrics::record_alert(&event.name, "sent");
                true
            } else {
                tracing::warn!(
                    probe = %event.name,
                    alert_id = %event.id,
                    "Alert delivered, but another one was accepted recently; state unchanged"
                );
                metrics::record_alert(&event.name, "duplicate");
                false
            }
        }
        Err(e) => {
            // Badness is left alone so the next alerting cycle tries again.
            tracing::error!(
                probe = %event.name,
                alert_id = %event.id,
                error = %e,
                "Failed to alert"
            );
            metrics::record_alert(&event.name, "failed");
            false
        }
    }
}

//! Metrics collection and exposition.
//!
//! # Metrics
//! - `prober_runs_total` (counter): completed runs by probe, result
//! - `prober_probe_duration_seconds` (histogram): time spent in one call
//! - `prober_badness` (gauge): current badness per probe
//! - `prober_alerting` (gauge): 1=alerting, 0=quiet
//! - `prober_alerts_total` (counter): alert decisions by probe, result
//! - `prober_disabled` (gauge): 1 when the probe is filtered out

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and serve it on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_run(probe: &str, passed: bool, badness: i64, alerting: bool) {
    let result = if passed { "pass" } else { "fail" };
    counter!("prober_runs_total", "probe" => probe.to_string(), "result" => result).increment(1);
    gauge!("prober_badness", "probe" => probe.to_string()).set(badness as f64);
    gauge!("prober_alerting", "probe" => probe.to_string()).set(if alerting { 1.0 } else { 0.0 });
}

pub fn record_probe_duration(probe: &str, elapsed: Duration) {
    histogram!("prober_probe_duration_seconds", "probe" => probe.to_string())
        .record(elapsed.as_secs_f64());
}

/// `result` is one of sent, failed, duplicate, suppressed, muted.
pub fn record_alert(probe: &str, result: &'static str) {
    counter!("prober_alerts_total", "probe" => probe.to_string(), "result" => result).increment(1);
}

pub fn record_disabled(probe: &str) {
    gauge!("prober_disabled", "probe" => probe.to_string()).set(1.0);
}

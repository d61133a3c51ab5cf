//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the prober.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::probe::settings::{OverrunPolicy, ProbeSettings};
use crate::records::log::default_log_path;
use crate::records::DEFAULT_CAPACITY;
use crate::scoring::{AlertPolicy, BadnessPolicy};

/// Root configuration for the prober.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProberConfig {
    /// Process-wide alerting settings.
    pub alerting: AlertingConfig,

    /// Which probes run at all.
    pub selection: SelectionConfig,

    /// Defaults applied to probes that don't override them.
    pub defaults: ProbeDefaults,

    /// Durable outcome log.
    pub record_log: RecordLogConfig,

    /// Read-only status API.
    pub admin: AdminConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,

    /// Probe definitions.
    pub probes: Vec<ProbeConfig>,
}

/// Alerting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AlertingConfig {
    /// Level of badness at which a probe is alerting.
    pub threshold: i64,

    /// Never accept alerts for one probe more often than this.
    pub max_frequency_secs: u64,

    /// Disable alert delivery entirely.
    pub disabled: bool,

    /// Endpoint receiving alerts as JSON. Empty means log-only.
    pub webhook_url: String,

    /// Timeout for one webhook delivery in seconds.
    pub webhook_timeout_secs: u64,
}

impl Default for AlertingConfig {
    fn default() -> Self {
        Self {
            threshold: 100,
            max_frequency_secs: 15 * 60,
            disabled: false,
            webhook_url: String::new(),
            webhook_timeout_secs: 30,
        }
    }
}

impl AlertingConfig {
    pub fn policy(&self) -> AlertPolicy {
        AlertPolicy {
            threshold: self.threshold,
            max_frequency: Duration::from_secs(self.max_frequency_secs),
            disabled: self.disabled,
        }
    }
}

/// Allow-list / deny-list of probe names.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// When non-empty, only these probes run.
    pub only: Vec<String>,

    /// Probes that never run (ignored when `only` is set).
    pub disabled: Vec<String>,
}

/// Defaults for per-probe settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeDefaults {
    /// Pause between probe runs in seconds.
    pub interval_secs: u64,

    /// Badness added on failure.
    pub failure_penalty: i64,

    /// Badness removed on success.
    pub success_reward: i64,

    /// Lowest badness value.
    pub min_badness: i64,

    /// Treatment of calls that outlive their interval.
    pub overrun: OverrunPolicy,
}

impl Default for ProbeDefaults {
    fn default() -> Self {
        Self {
            interval_secs: 61,
            failure_penalty: 10,
            success_reward: 1,
            min_badness: 0,
            overrun: OverrunPolicy::Abandon,
        }
    }
}

/// Durable record log configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RecordLogConfig {
    /// Path of the append-only outcome log.
    pub path: PathBuf,

    /// Records kept in memory per probe.
    pub capacity: usize,
}

impl Default for RecordLogConfig {
    fn default() -> Self {
        Self {
            path: default_log_path(),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Kind of check a probe performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    #[default]
    Http,
    Tcp,
}

/// One probe definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbeConfig {
    /// Unique probe identifier.
    pub name: String,

    /// Human-readable description; derived from the target when empty.
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub kind: ProbeKind,

    /// URL for http probes, `host:port` for tcp probes.
    pub target: String,

    /// HTTP method (http only).
    #[serde(default = "default_method")]
    pub method: String,

    /// Expected HTTP status (http only).
    #[serde(default = "default_expect_status")]
    pub expect_status: u16,

    /// Substring the response body must contain (http only).
    #[serde(default)]
    pub expect_body: Option<String>,

    pub interval_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub failure_penalty: Option<i64>,
    pub success_reward: Option<i64>,
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_expect_status() -> u16 {
    200
}

impl ProbeConfig {
    pub fn description(&self) -> String {
        if !self.description.is_empty() {
            return self.description.clone();
        }
        match self.kind {
            ProbeKind::Http => format!("Probes HTTP response of {}", self.target),
            ProbeKind::Tcp => format!("Probes TCP connectivity of {}", self.target),
        }
    }

    /// Resolve this probe's settings against the process defaults.
    pub fn settings(&self, defaults: &ProbeDefaults, capacity: usize) -> ProbeSettings {
        let interval = Duration::from_secs(self.interval_secs.unwrap_or(defaults.interval_secs));
        let timeout = self.timeout_secs.map(Duration::from_secs).unwrap_or(interval);
        ProbeSettings {
            name: self.name.clone(),
            description: self.description(),
            interval,
            timeout,
            badness: BadnessPolicy {
                floor: defaults.min_badness,
                increment: self.failure_penalty.unwrap_or(defaults.failure_penalty),
                decrement: self.success_reward.unwrap_or(defaults.success_reward),
            },
            capacity,
            overrun: defaults.overrun,
        }
    }
}

/// Status API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Serve the status API.
    pub enabled: bool,

    /// Bind address.
    pub bind_address: String,

    /// Bearer token; empty disables authentication.
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "127.0.0.1:8080".to_string(),
            api_key: String::new(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON.
    pub json_logs: bool,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: ProberConfig = toml::from_str("").unwrap();
        assert_eq!(config.alerting.threshold, 100);
        assert_eq!(config.alerting.policy().max_frequency, Duration::from_secs(900));
        assert_eq!(config.defaults.interval_secs, 61);
        assert_eq!(config.record_log.capacity, 200);
        assert!(config.probes.is_empty());
    }

    #[test]
    fn test_probe_settings_resolution() {
        let config: ProberConfig = toml::from_str(
            r#"
            [defaults]
            interval_secs = 30
            failure_penalty = 7

            [[probes]]
            name = "home"
            target = "https://example.com/"
            expect_body = "Example"

            [[probes]]
            name = "db"
            kind = "tcp"
            target = "db.internal:5432"
            interval_secs = 300
            timeout_secs = 60
            failure_penalty = 5
            "#,
        )
        .unwrap();

        let home = config.probes[0].settings(&config.defaults, 50);
        assert_eq!(home.interval, Duration::from_secs(30));
        assert_eq!(home.timeout, Duration::from_secs(30));
        assert_eq!(home.badness.increment, 7);
        assert_eq!(home.capacity, 50);
        assert_eq!(home.description, "Probes HTTP response of https://example.com/");
        assert_eq!(config.probes[0].method, "GET");
        assert_eq!(config.probes[0].expect_status, 200);

        let db = config.probes[1].settings(&config.defaults, 50);
        assert_eq!(config.probes[1].kind, ProbeKind::Tcp);
        assert_eq!(db.interval, Duration::from_secs(300));
        assert_eq!(db.timeout, Duration::from_secs(60));
        assert_eq!(db.badness.increment, 5);
        assert_eq!(db.badness.decrement, 1);
    }

    #[test]
    fn test_overrun_policy_parses() {
        let config: ProberConfig = toml::from_str("[defaults]\noverrun = \"abort\"\n").unwrap();
        assert_eq!(config.defaults.overrun, OverrunPolicy::Abort);
    }
}

//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, threshold > 0)
//! - Check probe targets and bind addresses parse
//! - Detect duplicate probe names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProberConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::{ProbeKind, ProberConfig};

/// One semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &ProberConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.alerting.threshold <= 0 {
        errors.push(ValidationError::new("alerting.threshold", "must be greater than 0"));
    }
    if !config.alerting.webhook_url.is_empty() && Url::parse(&config.alerting.webhook_url).is_err() {
        errors.push(ValidationError::new("alerting.webhook_url", "is not a valid URL"));
    }
    if config.alerting.webhook_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "alerting.webhook_timeout_secs",
            "must be greater than 0",
        ));
    }

    if config.defaults.interval_secs == 0 {
        errors.push(ValidationError::new("defaults.interval_secs", "must be greater than 0"));
    }
    if config.defaults.failure_penalty <= 0 {
        errors.push(ValidationError::new("defaults.failure_penalty", "must be greater than 0"));
    }
    if config.defaults.success_reward < 0 {
        errors.push(ValidationError::new("defaults.success_reward", "must not be negative"));
    }
    if config.record_log.capacity == 0 {
        errors.push(ValidationError::new("record_log.capacity", "must be greater than 0"));
    }

    if config.admin.enabled && config.admin.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new("admin.bind_address", "is not a socket address"));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "is not a socket address",
        ));
    }

    let mut seen = HashSet::new();
    for (i, probe) in config.probes.iter().enumerate() {
        let field = |name: &str| format!("probes[{i}].{name}");

        if probe.name.trim().is_empty() {
            errors.push(ValidationError::new(field("name"), "must not be empty"));
        } else if !seen.insert(probe.name.as_str()) {
            errors.push(ValidationError::new(
                field("name"),
                format!("duplicate probe name {:?}", probe.name),
            ));
        }

        match probe.kind {
            ProbeKind::Http => {
                match Url::parse(&probe.target) {
                    Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                    _ => errors.push(ValidationError::new(field("target"), "is not an http(s) URL")),
                }
                if probe.method.parse::<reqwest::Method>().is_err() {
                    errors.push(ValidationError::new(field("method"), "is not an HTTP method"));
                }
                if !(100..=999).contains(&probe.expect_status) {
                    errors.push(ValidationError::new(field("expect_status"), "is not an HTTP status"));
                }
            }
            ProbeKind::Tcp => {
                if !is_host_port(&probe.target) {
                    errors.push(ValidationError::new(field("target"), "must be host:port"));
                }
            }
        }

        if probe.interval_secs == Some(0) {
            errors.push(ValidationError::new(field("interval_secs"), "must be greater than 0"));
        }
        if probe.timeout_secs == Some(0) {
            errors.push(ValidationError::new(field("timeout_secs"), "must be greater than 0"));
        }
        if matches!(probe.failure_penalty, Some(p) if p <= 0) {
            errors.push(ValidationError::new(field("failure_penalty"), "must be greater than 0"));
        }
        if matches!(probe.success_reward, Some(r) if r < 0) {
            errors.push(ValidationError::new(field("success_reward"), "must not be negative"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_host_port(target: &str) -> bool {
    match target.rsplit_once(':') {
        Some((host, port)) => !host.is_empty() && port.parse::<u16>().is_ok(),
        None => false,
    }
}

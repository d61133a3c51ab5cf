//! Concrete `Prober` implementations.
//!
//! # Design Decisions
//! - Checks never retry; the badness score already smooths out flaps
//! - Checks carry no timeout of their own; the runner races them against
//!   the probe interval

pub mod http;
pub mod tcp;

use std::sync::Arc;

pub use http::HttpProber;
pub use tcp::TcpProber;

use crate::config::{ProbeConfig, ProbeKind};
use crate::probe::capability::Prober;
use crate::probe::error::ProbeError;

/// Build the check described by one `[[probes]]` entry.
pub fn from_config(config: &ProbeConfig) -> Result<Arc<dyn Prober>, ProbeError> {
    let prober: Arc<dyn Prober> = match config.kind {
        ProbeKind::Http => Arc::new(HttpProber::from_config(config)?),
        ProbeKind::Tcp => Arc::new(TcpProber::new(config.target.clone())),
    };
    Ok(prober)
}

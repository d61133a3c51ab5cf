//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Probe runners produce:
//!     → tracing events (one per run, one per alert decision)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, text or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Metric calls are no-ops until a recorder is installed, so tests and
//!   library users pay nothing
//! - Metric labels are limited to probe name and alert result

pub mod logging;
pub mod metrics;

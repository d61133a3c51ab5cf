//! Probe scheduler and alerting engine.
//!
//! Runs a set of independent probes on fixed intervals, scores each one with
//! a badness value, keeps a bounded history of outcomes and raises throttled
//! alerts when badness crosses a threshold.

// Core engine
pub mod probe;
pub mod records;
pub mod scoring;

// Collaborators
pub mod alert;
pub mod checks;

// Cross-cutting concerns
pub mod admin;
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::ProberConfig;
pub use lifecycle::{Shutdown, Supervisor};
pub use probe::{prober_fn, Alerter, ProbeHandle, ProbeRunner, ProbeSettings, Prober};

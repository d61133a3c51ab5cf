//! Probe engine.
//!
//! # Data Flow
//! ```text
//! lifecycle::startup
//!     → registry.rs (ProbeHandle per configured probe, unique names)
//!     → runner.rs (one task per probe)
//!         → enablement.rs (allow/deny check before every cycle)
//!         → capability.rs (Prober::probe raced against the interval)
//!         → state.rs (badness, records, alert decision)
//!         → records::RecordLog (durable append)
//!         → capability.rs (Alerter::alert, detached)
//! ```
//!
//! # Design Decisions
//! - Runners never synchronize with each other
//! - Probe and alert failures stay inside the runner
//! - Record log failures are fatal and bubble up to the supervisor

pub mod capability;
pub mod enablement;
pub mod error;
pub mod registry;
pub mod runner;
pub mod settings;
pub mod state;

pub use capability::{prober_fn, Alerter, Prober};
pub use enablement::{EnablementFilter, NameFilter};
pub use error::{AlertError, ProbeError, RecordLogError, RunnerError};
pub use registry::ProbeRegistry;
pub use runner::ProbeRunner;
pub use settings::{OverrunPolicy, ProbeSettings};
pub use state::{ProbeDetail, ProbeHandle, ProbeSnapshot};

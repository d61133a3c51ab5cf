//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Open record log → Build probes → Bind status API → Spawn runners
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Runners leave their loop → Status API drains → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - A runner that hits a record log error stops the whole process
//! - Alert deliveries still in flight at shutdown are dropped

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{StartupError, Supervisor};

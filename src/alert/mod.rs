//! Alert events and delivery.
//!
//! # Data Flow
//! ```text
//! Probe cycle decides to dispatch
//!     → event.rs (AlertEvent: name, description, badness, recent failures)
//!     → detached delivery task
//!     → Alerter implementation (log.rs, webhook.rs)
//!     → ProbeHandle::complete_alert on success
//! ```
//!
//! # Design Decisions
//! - Delivery is best-effort, at-least-once
//! - Alerters never touch probe state; the runner applies the outcome

pub mod event;
pub mod log;
pub mod webhook;

pub use event::AlertEvent;
pub use log::LogAlerter;
pub use webhook::WebhookAlerter;

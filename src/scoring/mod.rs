//! Failure scoring and alert throttling.
//!
//! # Data Flow
//! ```text
//! Probe outcome
//!     → badness.rs (raise on failure, decay on success, floor clamp)
//!     → AlertPolicy::is_alerting (badness >= threshold)
//!     → throttle.rs (global mute, minimum spacing between alerts)
//!     → dispatch / suppress
//! ```
//!
//! # Design Decisions
//! - Alerting is derived from badness every cycle, no hysteresis
//! - Spacing is enforced on *accepted* alerts, not on attempts
//! - Both components are plain state machines; time is passed in

pub mod badness;
pub mod throttle;

pub use badness::{BadnessAccumulator, BadnessPolicy};
pub use throttle::{AlertPolicy, AlertThrottle, ThrottleDecision};

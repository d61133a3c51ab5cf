//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → command-line overrides (main.rs)
//!     → ProberConfig (validated, immutable)
//!     → startup builds one ProbeSettings per [[probes]] entry
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AlertingConfig;
pub use schema::ProbeConfig;
pub use schema::ProbeKind;
pub use schema::ProberConfig;
pub use schema::SelectionConfig;

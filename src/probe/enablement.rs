//! Probe enablement filter.
//!
//! # Policy
//! ```text
//! only-list non-empty → enabled iff name ∈ only   (deny-list ignored)
//! only-list empty     → enabled iff name ∉ disabled
//! ```
//!
//! # Design Decisions
//! - Evaluated by each runner before every cycle
//! - Name sets are immutable after construction and shared without locking

use std::collections::HashSet;

use crate::config::SelectionConfig;

/// Decides whether a named probe may run.
pub trait EnablementFilter: Send + Sync {
    fn is_enabled(&self, name: &str) -> bool;
}

/// Allow-list / deny-list filter on probe names.
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    only: HashSet<String>,
    disabled: HashSet<String>,
}

impl NameFilter {
    pub fn new<I, J, S, T>(only: I, disabled: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            only: only.into_iter().map(Into::into).collect(),
            disabled: disabled.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &SelectionConfig) -> Self {
        Self::new(config.only.iter().cloned(), config.disabled.iter().cloned())
    }

    /// A filter that enables every probe.
    pub fn allow_all() -> Self {
        Self::default()
    }
}

impl EnablementFilter for NameFilter {
    fn is_enabled(&self, name: &str) -> bool {
        if !self.only.is_empty() {
            return self.only.contains(name);
        }
        !self.disabled.contains(name)
    }
}

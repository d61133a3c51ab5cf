//! Registry of all probes in the process.
//!
//! # Responsibilities
//! - Own the `Arc<ProbeHandle>` of every configured probe
//! - Reject duplicate names
//! - Serve lookups for the status API

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;

use crate::probe::state::ProbeHandle;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("probe {0:?} is already registered")]
    Duplicate(String),
}

/// Thread-safe name → probe map.
#[derive(Debug, Clone, Default)]
pub struct ProbeRegistry {
    inner: Arc<DashMap<String, Arc<ProbeHandle>>>,
}

impl ProbeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, probe: Arc<ProbeHandle>) -> Result<(), RegistryError> {
        match self.inner.entry(probe.name().to_string()) {
            Entry::Occupied(e) => Err(RegistryError::Duplicate(e.key().clone())),
            Entry::Vacant(e) => {
                e.insert(probe);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<ProbeHandle>> {
        self.inner.get(name).map(|r| r.value().clone())
    }

    /// All probes, ordered by name.
    pub fn all(&self) -> Vec<Arc<ProbeHandle>> {
        let mut probes: Vec<_> = self.inner.iter().map(|r| r.value().clone()).collect();
        probes.sort_by(|a, b| a.name().cmp(b.name()));
        probes
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// (alerting, disabled) counts.
    pub fn summary(&self) -> (usize, usize) {
        let mut alerting = 0;
        let mut disabled = 0;
        for r in self.inner.iter() {
            let snap = r.value().snapshot();
            if snap.alerting {
                alerting += 1;
            }
            if snap.disabled {
                disabled += 1;
            }
        }
        (alerting, disabled)
    }
}

//! Startup orchestration.
//!
//! # Responsibilities
//! - Open the record log before any probe runs
//! - Build one probe, check and runner per configured probe
//! - Bind the status API
//! - Supervise runners until a signal or a fatal runner error
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - `bind` does all fallible setup, `run` only spawns and waits
//! - Listeners start last (API only serves once probes exist)

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use url::Url;

use crate::admin::{self, AdminState};
use crate::alert::{LogAlerter, WebhookAlerter};
use crate::checks;
use crate::config::ProberConfig;
use crate::lifecycle::Shutdown;
use crate::probe::capability::Alerter;
use crate::probe::enablement::{EnablementFilter, NameFilter};
use crate::probe::error::{AlertError, ProbeError, RecordLogError, RunnerError};
use crate::probe::registry::RegistryError;
use crate::probe::{ProbeHandle, ProbeRegistry, ProbeRunner};
use crate::records::RecordLog;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    RecordLog(#[from] RecordLogError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("probe {probe}: {source}")]
    Check {
        probe: String,
        #[source]
        source: ProbeError,
    },

    #[error("invalid webhook URL: {0}")]
    WebhookUrl(#[from] url::ParseError),

    #[error("failed to build alerter: {0}")]
    Alerter(#[from] AlertError),

    #[error("failed to bind status API on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Runner(#[from] RunnerError),
}

/// Owns every runner and the status API for the life of the process.
pub struct Supervisor {
    registry: ProbeRegistry,
    runners: Vec<ProbeRunner>,
    admin: Option<(TcpListener, AdminState)>,
    shutdown: Shutdown,
}

impl Supervisor {
    /// Do all fallible setup: open the log, build probes, bind the API.
    pub async fn bind(config: &ProberConfig) -> Result<Self, StartupError> {
        let log = Arc::new(RecordLog::open(&config.record_log.path)?);

        let alerter = build_alerter(config)?;
        let filter: Arc<dyn EnablementFilter> =
            Arc::new(NameFilter::from_config(&config.selection));
        let policy = config.alerting.policy();

        let registry = ProbeRegistry::new();
        let mut runners = Vec::with_capacity(config.probes.len());
        for probe_config in &config.probes {
            let settings = probe_config.settings(&config.defaults, config.record_log.capacity);
            let probe = Arc::new(ProbeHandle::new(settings, policy));
            registry.register(probe.clone())?;

            let prober = checks::from_config(probe_config).map_err(|source| StartupError::Check {
                probe: probe_config.name.clone(),
                source,
            })?;

            runners.push(ProbeRunner::new(
                probe,
                prober,
                alerter.clone(),
                filter.clone(),
                log.clone(),
            ));
        }

        let admin = if config.admin.enabled {
            let listener = TcpListener::bind(&config.admin.bind_address)
                .await
                .map_err(|source| StartupError::Bind {
                    address: config.admin.bind_address.clone(),
                    source,
                })?;
            let state = AdminState::new(registry.clone(), config.admin.api_key.as_str());
            Some((listener, state))
        } else {
            None
        };

        Ok(Self {
            registry,
            runners,
            admin,
            shutdown: Shutdown::new(),
        })
    }

    pub fn registry(&self) -> &ProbeRegistry {
        &self.registry
    }

    /// Address the status API is bound to, if enabled.
    pub fn admin_addr(&self) -> Option<SocketAddr> {
        self.admin
            .as_ref()
            .and_then(|(listener, _)| listener.local_addr().ok())
    }

    /// Run until `signal` resolves or a runner fails fatally.
    pub async fn run<F>(self, signal: F) -> Result<(), StartupError>
    where
        F: Future<Output = ()>,
    {
        let Self {
            runners: pending,
            admin,
            shutdown,
            ..
        } = self;

        let mut runners = JoinSet::new();
        for runner in pending {
            runners.spawn(runner.run(shutdown.subscribe()));
        }
        tracing::info!(probes = runners.len(), "Probe runners started");

        let admin_task = admin.map(|(listener, state)| {
            tokio::spawn(admin::serve(listener, state, shutdown.subscribe()))
        });

        tokio::pin!(signal);
        let result = loop {
            tokio::select! {
                Some(joined) = runners.join_next() => match joined {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        tracing::error!(error = %e, "Probe runner failed, shutting down");
                        break Err(StartupError::Runner(e));
                    }
                    Err(e) => tracing::error!(error = %e, "Probe runner task ended abnormally"),
                },
                _ = &mut signal => {
                    tracing::info!("Shutdown requested");
                    break Ok(());
                }
            }
        };

        shutdown.trigger();
        while runners.join_next().await.is_some() {}

        if let Some(task) = admin_task {
            match task.await {
                Ok(Err(e)) => tracing::error!(error = %e, "Status API failed"),
                Err(e) => tracing::error!(error = %e, "Status API task ended abnormally"),
                Ok(Ok(())) => {}
            }
        }

        tracing::info!("Shutdown complete");
        result
    }
}

fn build_alerter(config: &ProberConfig) -> Result<Arc<dyn Alerter>, StartupError> {
    if config.alerting.webhook_url.is_empty() {
        tracing::info!("No webhook configured, alerts go to the log");
        return Ok(Arc::new(LogAlerter));
    }
    let url = Url::parse(&config.alerting.webhook_url)?;
    let timeout = Duration::from_secs(config.alerting.webhook_timeout_secs);
    tracing::info!(url = %url, "Alerts delivered by webhook");
    Ok(Arc::new(WebhookAlerter::new(url, timeout)?))
}

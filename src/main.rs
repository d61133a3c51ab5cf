//! Prober daemon.
//!
//! ```text
//!   prober.toml ─▶ config ─▶ Supervisor::bind ─┬─▶ RecordLog (append-only)
//!                                             ├─▶ ProbeRegistry ◀── status API
//!                                             └─▶ ProbeRunner × N
//!                                                   │
//!                                                   ├─▶ Prober (http / tcp)
//!                                                   └─▶ Alerter (log / webhook)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use prober::config::{self, ProberConfig};
use prober::lifecycle::{signals, Supervisor};
use prober::observability;

#[derive(Parser, Debug)]
#[command(name = "prober")]
#[command(about = "Runs probes on fixed intervals and alerts when they keep failing", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "prober.toml")]
    config: PathBuf,

    /// Run only these probes (comma separated).
    #[arg(long, value_delimiter = ',')]
    only: Vec<String>,

    /// Never run these probes (comma separated).
    #[arg(long, value_delimiter = ',')]
    disable: Vec<String>,

    /// Disable alert delivery.
    #[arg(long)]
    no_alerts: bool,

    /// Badness level at which probes alert.
    #[arg(long)]
    alert_threshold: Option<i64>,
}

impl Cli {
    fn apply(&self, config: &mut ProberConfig) {
        if !self.only.is_empty() {
            config.selection.only = self.only.clone();
        }
        config.selection.disabled.extend(self.disable.iter().cloned());
        if self.no_alerts {
            config.alerting.disabled = true;
        }
        if let Some(threshold) = self.alert_threshold {
            config.alerting.threshold = threshold;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match config::load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("prober: {}: {e}", cli.config.display());
            return ExitCode::FAILURE;
        }
    };
    cli.apply(&mut config);

    observability::logging::init(
        &config.observability.log_level,
        config.observability.json_logs,
    );
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "prober starting");

    if config.alerting.threshold <= 0 {
        tracing::error!(threshold = config.alerting.threshold, "Alert threshold must be greater than 0");
        return ExitCode::FAILURE;
    }

    tracing::info!(
        probes = config.probes.len(),
        alert_threshold = config.alerting.threshold,
        alerts_disabled = config.alerting.disabled,
        only = ?config.selection.only,
        disabled = ?config.selection.disabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let supervisor = match Supervisor::bind(&config).await {
        Ok(supervisor) => supervisor,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    match supervisor.run(signals::wait_for_signal()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}

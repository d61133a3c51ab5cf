use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::admin::AdminState;
use crate::probe::{ProbeDetail, ProbeSnapshot};

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub started_at: DateTime<Utc>,
    pub probes: usize,
    pub alerting: usize,
    pub disabled: usize,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    let (alerting, disabled) = state.registry.summary();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: if alerting > 0 { "alerting" } else { "ok" },
        started_at: state.started_at,
        probes: state.registry.len(),
        alerting,
        disabled,
    })
}

pub async fn get_probes(State(state): State<AdminState>) -> Json<Vec<ProbeSnapshot>> {
    Json(state.registry.all().iter().map(|p| p.snapshot()).collect())
}

pub async fn get_probe(
    State(state): State<AdminState>,
    Path(name): Path<String>,
) -> Result<Json<ProbeDetail>, StatusCode> {
    let probe = state.registry.get(&name).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(probe.detail(Utc::now())))
}

//! Read-only status API.
//!
//! # Responsibilities
//! - Expose probe snapshots as JSON
//! - Optional bearer-token authentication
//!
//! # Design Decisions
//! - No write endpoints; probes are configured only through the config file
//! - Handlers read snapshots, they never hold a probe lock across an await

pub mod auth;
pub mod handlers;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use chrono::{DateTime, Utc};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::probe::ProbeRegistry;

/// State shared by all status handlers.
#[derive(Clone)]
pub struct AdminState {
    pub registry: ProbeRegistry,
    pub started_at: DateTime<Utc>,
    /// Empty disables authentication.
    pub api_key: Arc<str>,
}

impl AdminState {
    pub fn new(registry: ProbeRegistry, api_key: impl Into<Arc<str>>) -> Self {
        Self {
            registry,
            started_at: Utc::now(),
            api_key: api_key.into(),
        }
    }
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/status", get(get_status))
        .route("/probes", get(get_probes))
        .route("/probes/{name}", get(get_probe))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the status API until shutdown fires.
pub async fn serve(
    listener: TcpListener,
    state: AdminState,
    mut shutdown: broadcast::Receiver<()>,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(address = %addr, "Status API listening");
    }
    axum::serve(listener, setup_admin_router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await
}

//! TCP connectivity check.

use futures_util::future::{BoxFuture, FutureExt};
use tokio::net::TcpStream;

use crate::probe::capability::Prober;
use crate::probe::error::ProbeError;

/// Passes when a TCP connection to `host:port` can be established.
#[derive(Debug, Clone)]
pub struct TcpProber {
    target: String,
}

impl TcpProber {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

impl Prober for TcpProber {
    fn probe(&self) -> BoxFuture<'_, Result<(), ProbeError>> {
        async move {
            let stream = TcpStream::connect(&self.target)
                .await
                .map_err(|e| ProbeError::check(format!("failed to connect to {}: {e}", self.target)))?;
            tracing::trace!(target_addr = %self.target, peer = ?stream.peer_addr().ok(), "TCP probe connected");
            Ok(())
        }
        .boxed()
    }
}

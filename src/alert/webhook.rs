//! Alerter that POSTs the alert as JSON to an HTTP endpoint.
//!
//! # Design Decisions
//! - Any non-2xx response is a failed delivery
//! - Requests carry their own timeout so a hung endpoint cannot keep a
//!   delivery task alive forever

use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};
use url::Url;

use crate::alert::AlertEvent;
use crate::probe::capability::Alerter;
use crate::probe::error::AlertError;

/// Timeout for one delivery request.
pub const DEFAULT_WEBHOOK_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct WebhookAlerter {
    client: reqwest::Client,
    url: Url,
}

impl WebhookAlerter {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, AlertError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("prober/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AlertError::Delivery(e.to_string()))?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Alerter for WebhookAlerter {
    fn alert<'a>(&'a self, event: &'a AlertEvent) -> BoxFuture<'a, Result<(), AlertError>> {
        async move {
            let response = self
                .client
                .post(self.url.clone())
                .json(event)
                .send()
                .await
                .map_err(|e| AlertError::Delivery(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                tracing::warn!(
                    alert_id = %event.id,
                    url = %self.url,
                    status = %status,
                    "Alert endpoint rejected delivery"
                );
                return Err(AlertError::Status(status.as_u16()));
            }
            Ok(())
        }
        .boxed()
    }
}

//! HTTP response check.
//!
//! # Responsibilities
//! - Send one request with the configured method
//! - Require the expected status code
//! - Optionally require a substring in the first `MAX_RESPONSE_BYTES` of the body

use futures_util::future::{BoxFuture, FutureExt};
use reqwest::{Method, StatusCode};
use url::Url;

use crate::config::ProbeConfig;
use crate::probe::capability::Prober;
use crate::probe::error::ProbeError;

/// Largest response body read.
pub const MAX_RESPONSE_BYTES: usize = 1_000_000;

#[derive(Debug, Clone)]
pub struct HttpProber {
    client: reqwest::Client,
    method: Method,
    target: Url,
    expect_status: StatusCode,
    expect_body: Option<String>,
}

impl HttpProber {
    /// A GET check expecting 200.
    pub fn new(target: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            method: Method::GET,
            target,
            expect_status: StatusCode::OK,
            expect_body: None,
        }
    }

    pub fn from_config(config: &ProbeConfig) -> Result<Self, ProbeError> {
        let target = Url::parse(&config.target)
            .map_err(|e| ProbeError::check(format!("invalid target {:?}: {e}", config.target)))?;
        let method = config
            .method
            .parse::<Method>()
            .map_err(|e| ProbeError::check(format!("invalid method {:?}: {e}", config.method)))?;
        let status = StatusCode::from_u16(config.expect_status)
            .map_err(|e| ProbeError::check(format!("invalid status {}: {e}", config.expect_status)))?;

        let mut prober = Self::new(target).method(method).expect_status(status);
        if let Some(body) = &config.expect_body {
            prober = prober.expect_body(body.clone());
        }
        Ok(prober)
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn expect_status(mut self, status: StatusCode) -> Self {
        self.expect_status = status;
        self
    }

    pub fn expect_body(mut self, needle: impl Into<String>) -> Self {
        self.expect_body = Some(needle.into());
        self
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    async fn check(&self) -> Result<(), ProbeError> {
        let mut response = self
            .client
            .request(self.method.clone(), self.target.clone())
            .send()
            .await
            .map_err(|e| ProbeError::check(format!("failed to send HTTP request: {e}")))?;

        let status = response.status();
        if status != self.expect_status {
            return Err(ProbeError::check(format!(
                "unexpected HTTP response: {status} (want {})",
                self.expect_status
            )));
        }

        let Some(needle) = &self.expect_body else {
            return Ok(());
        };

        let mut body = Vec::new();
        while body.len() < MAX_RESPONSE_BYTES {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    let room = MAX_RESPONSE_BYTES - body.len();
                    body.extend_from_slice(&chunk[..chunk.len().min(room)]);
                }
                Ok(None) => break,
                Err(e) => {
                    return Err(ProbeError::check(format!(
                        "failed to read HTTP response: {e}"
                    )))
                }
            }
        }

        let text = String::from_utf8_lossy(&body);
        if !text.contains(needle.as_str()) {
            return Err(ProbeError::check(format!(
                "response doesn't contain {needle:?}:\n{text}"
            )));
        }
        Ok(())
    }
}

impl Prober for HttpProber {
    fn probe(&self) -> BoxFuture<'_, Result<(), ProbeError>> {
        self.check().boxed()
    }
}

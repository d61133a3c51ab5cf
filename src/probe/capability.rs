//! Capabilities a probe is built from.
//!
//! A probe needs two things from the outside world: a way to check its
//! target once (`Prober`) and a way to notify a human (`Alerter`). Concrete
//! checks live in `crate::checks`, concrete alerters in `crate::alert`.

use std::future::Future;

use futures_util::future::{BoxFuture, FutureExt};

use crate::alert::AlertEvent;
use crate::probe::error::{AlertError, ProbeError};

/// Checks a target once. `Err` means the probe failed.
pub trait Prober: Send + Sync + 'static {
    fn probe(&self) -> BoxFuture<'_, Result<(), ProbeError>>;
}

/// Delivers one alert notification attempt.
pub trait Alerter: Send + Sync + 'static {
    fn alert<'a>(&'a self, event: &'a AlertEvent) -> BoxFuture<'a, Result<(), AlertError>>;
}

/// A `Prober` backed by an async closure.
pub struct FnProber<F> {
    f: F,
}

/// Wrap an async closure as a `Prober`.
pub fn prober_fn<F, Fut>(f: F) -> FnProber<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ProbeError>> + Send + 'static,
{
    FnProber { f }
}

impl<F, Fut> Prober for FnProber<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ProbeError>> + Send + 'static,
{
    fn probe(&self) -> BoxFuture<'_, Result<(), ProbeError>> {
        (self.f)().boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_prober_fn_runs_closure() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();
        let prober = prober_fn(move || {
            let c = c.clone();
            async move {
                if c.fetch_add(1, Ordering::SeqCst) == 0 {
                    Ok(())
                } else {
                    Err(ProbeError::check("second call fails"))
                }
            }
        });

        assert!(prober.probe().await.is_ok());
        assert_eq!(
            prober.probe().await,
            Err(ProbeError::check("second call fails"))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}

//! Alerter that only writes the alert to the log.

use futures_util::future::{BoxFuture, FutureExt};

use crate::alert::AlertEvent;
use crate::probe::capability::Alerter;
use crate::probe::error::AlertError;

/// Logs alerts at error level. Used when no delivery endpoint is configured.
#[derive(Debug, Clone, Default)]
pub struct LogAlerter;

impl Alerter for LogAlerter {
    fn alert<'a>(&'a self, event: &'a AlertEvent) -> BoxFuture<'a, Result<(), AlertError>> {
        async move {
            tracing::error!(
                alert_id = %event.id,
                probe = %event.name,
                badness = event.badness,
                failures = event.records.len(),
                "ALERT: {}\n{}",
                event.subject(),
                event.body()
            );
            Ok(())
        }
        .boxed()
    }
}

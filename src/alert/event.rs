//! The payload handed to an alerter.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::records::Record;

/// One alert about one probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Correlates log lines of concurrent deliveries.
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub badness: i64,
    /// Failures from the last hour, most recent first.
    pub records: Vec<Record>,
    pub raised_at: DateTime<Utc>,
}

impl AlertEvent {
    pub fn new(
        name: &str,
        description: &str,
        badness: i64,
        records: Vec<Record>,
        raised_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.to_string(),
            badness,
            records,
            raised_at,
        }
    }

    /// One-line subject.
    pub fn subject(&self) -> String {
        format!("{} failed (badness {})", self.name, self.badness)
    }

    /// Multi-line text body listing the recent failures.
    pub fn body(&self) -> String {
        let mut body = format!(
            "{}\n{}\nbadness is now {}.\n",
            self.name, self.description, self.badness
        );
        if self.records.is_empty() {
            body.push_str("No failures in the last hour.\n");
            return body;
        }
        let _ = writeln!(body, "Recent failures:");
        for record in &self.records {
            let _ = writeln!(
                body,
                "  {} ({}): {}",
                record.time_millis,
                record.ago(self.raised_at),
                record.details
            );
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    #[test]
    fn test_body_lists_failures() {
        let now = Utc.with_ymd_and_hms(2024, 8, 1, 12, 0, 0).unwrap();
        let records = vec![
            Record::fail(now - TimeDelta::seconds(30), "HTTP 503"),
            Record::fail(now - TimeDelta::minutes(2), "connection refused"),
        ];
        let event = AlertEvent::new("web", "Probes https://example.com", 120, records, now);

        assert_eq!(event.subject(), "web failed (badness 120)");
        let body = event.body();
        assert!(body.contains("badness is now 120"));
        assert!(body.contains("30.0 sec ago): HTTP 503"));
        assert!(body.contains("2.0 min ago): connection refused"));
    }

    #[test]
    fn test_body_without_failures() {
        let now = Utc.with_ymd_and_hms(2024, 8, 1, 12, 0, 0).unwrap();
        let event = AlertEvent::new("dns", "", 100, Vec::new(), now);
        assert!(event.body().contains("No failures in the last hour"));
    }

    #[test]
    fn test_ids_are_unique() {
        let now = Utc::now();
        let a = AlertEvent::new("p", "", 1, Vec::new(), now);
        let b = AlertEvent::new("p", "", 1, Vec::new(), now);
        assert_ne!(a.id, b.id);
    }
}

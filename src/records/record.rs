//! The outcome of a single probe run.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Layout of the human-readable millisecond stamp, e.g. `Oct  7 09:04:05.123`.
const STAMP_MILLI: &str = "%b %e %H:%M:%S%.3f";

/// Result of one probe cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Start of the run (UTC).
    pub timestamp: DateTime<Utc>,
    /// Same instant as `timestamp`, formatted for humans reading the log.
    pub time_millis: String,
    /// Whether the probe passed.
    pub passed: bool,
    /// Diagnostic text; empty on success.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub details: String,
}

impl Record {
    /// Create a record for a run that started at `timestamp`.
    pub fn new(timestamp: DateTime<Utc>, passed: bool, details: impl Into<String>) -> Self {
        Self {
            timestamp,
            time_millis: timestamp.format(STAMP_MILLI).to_string(),
            passed,
            details: details.into(),
        }
    }

    pub fn pass(timestamp: DateTime<Utc>) -> Self {
        Self::new(timestamp, true, String::new())
    }

    pub fn fail(timestamp: DateTime<Utc>, details: impl Into<String>) -> Self {
        Self::new(timestamp, false, details)
    }

    /// Describe how long ago the record was produced, relative to `now`.
    pub fn ago(&self, now: DateTime<Utc>) -> String {
        describe_duration(now - self.timestamp)
    }
}

/// Human-readable description of an elapsed duration ("2.5 min ago").
pub fn describe_duration(d: TimeDelta) -> String {
    let secs = d.num_milliseconds() as f64 / 1000.0;
    if secs < 60.0 {
        format!("{:.1} sec ago", secs)
    } else if secs < 3600.0 {
        format!("{:.1} min ago", secs / 60.0)
    } else if secs < 86_400.0 {
        format!("{:.1} hrs ago", secs / 3600.0)
    } else {
        format!("{:.1} days ago", secs / 86_400.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_time_millis_format() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 7, 9, 4, 5).unwrap()
            + TimeDelta::milliseconds(123);
        let record = Record::pass(ts);
        assert_eq!(record.time_millis, "Mar  7 09:04:05.123");
        assert!(record.details.is_empty());
    }

    #[test]
    fn test_describe_duration_units() {
        assert_eq!(describe_duration(TimeDelta::seconds(4)), "4.0 sec ago");
        assert_eq!(describe_duration(TimeDelta::seconds(150)), "2.5 min ago");
        assert_eq!(describe_duration(TimeDelta::minutes(90)), "1.5 hrs ago");
        assert_eq!(describe_duration(TimeDelta::hours(72)), "3.0 days ago");
    }

    #[test]
    fn test_empty_details_not_serialized() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let json = serde_json::to_string(&Record::pass(ts)).unwrap();
        assert!(!json.contains("details"));

        let json = serde_json::to_string(&Record::fail(ts, "refused")).unwrap();
        assert!(json.contains("\"details\":\"refused\""));
        assert!(json.contains("\"passed\":false"));
    }

    #[test]
    fn test_ago() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let record = Record::fail(ts, "x");
        assert_eq!(record.ago(ts + TimeDelta::minutes(3)), "3.0 min ago");
    }
}

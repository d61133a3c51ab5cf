//! Decaying failure score ("badness").

use serde::{Deserialize, Serialize};

/// How a probe's badness moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadnessPolicy {
    /// Lowest value badness can take, and its starting value.
    pub floor: i64,
    /// Added on every failure.
    pub increment: i64,
    /// Subtracted on every success while above the floor.
    pub decrement: i64,
}

impl Default for BadnessPolicy {
    fn default() -> Self {
        Self {
            floor: 0,
            increment: 10,
            decrement: 1,
        }
    }
}

/// Per-probe badness state.
#[derive(Debug, Clone)]
pub struct BadnessAccumulator {
    badness: i64,
    policy: BadnessPolicy,
}

impl BadnessAccumulator {
    pub fn new(policy: BadnessPolicy) -> Self {
        Self {
            badness: policy.floor,
            policy,
        }
    }

    /// Apply one probe outcome and return the new badness.
    pub fn record(&mut self, passed: bool) -> i64 {
        if passed {
            self.record_success()
        } else {
            self.record_failure()
        }
    }

    pub fn record_failure(&mut self) -> i64 {
        self.badness = self.badness.saturating_add(self.policy.increment);
        self.badness
    }

    pub fn record_success(&mut self) -> i64 {
        if self.badness > self.policy.floor {
            self.badness = self
                .badness
                .saturating_sub(self.policy.decrement)
                .max(self.policy.floor);
        }
        self.badness
    }

    /// Drop badness back to the floor (after an accepted alert).
    pub fn reset(&mut self) {
        self.badness = self.policy.floor;
    }

    pub fn badness(&self) -> i64 {
        self.badness
    }

    pub fn policy(&self) -> BadnessPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_floor() {
        let acc = BadnessAccumulator::new(BadnessPolicy {
            floor: 5,
            ..Default::default()
        });
        assert_eq!(acc.badness(), 5);
    }

    #[test]
    fn test_failure_and_success_steps() {
        let mut acc = BadnessAccumulator::new(BadnessPolicy::default());
        assert_eq!(acc.record(false), 10);
        assert_eq!(acc.record(false), 20);
        assert_eq!(acc.record(true), 19);
    }

    #[test]
    fn test_never_below_floor() {
        let mut acc = BadnessAccumulator::new(BadnessPolicy {
            floor: 2,
            increment: 3,
            decrement: 4,
        });
        let outcomes = [true, false, true, true, false, false, true, true, true, true];
        for passed in outcomes {
            acc.record(passed);
            assert!(acc.badness() >= 2, "badness {} fell below floor", acc.badness());
        }
        assert_eq!(acc.badness(), 2);
    }

    #[test]
    fn test_consecutive_failures_reach_threshold() {
        let policy = BadnessPolicy::default();
        let mut acc = BadnessAccumulator::new(policy);
        let threshold = 35;
        let mut k = 0;
        while acc.badness() < threshold {
            acc.record_failure();
            k += 1;
        }
        // floor + k*inc >= threshold first holds at k = 4.
        assert_eq!(k, 4);
        assert_eq!(acc.badness(), policy.floor + k * policy.increment);
    }

    #[test]
    fn test_reset() {
        let mut acc = BadnessAccumulator::new(BadnessPolicy::default());
        acc.record_failure();
        acc.record_failure();
        acc.reset();
        assert_eq!(acc.badness(), 0);
    }
}

//! Retry policy with exponential backoff.

use std::time::Duration;

/// Exponential backoff: `base * 2^attempt`, capped at `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    /// Delay before the first retry.
    pub base: Duration,
    /// Upper bound on any single delay.
    pub max: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(1_000),
            max: Duration::from_secs(30),
        }
    }
}

impl Backoff {
    /// Delay for a retry attempt (0-based).
    pub fn delay(self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt);
        self.base.saturating_mul(factor).min(self.max)
    }
}

/// Per-occurrence retry configuration shared by immediate and recurring
/// tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts before the occurrence is abandoned.
    pub attempts: u32,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Backoff::default(),
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, backoff_base: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            backoff: Backoff {
                base: backoff_base,
                ..Backoff::default()
            },
        }
    }

    /// Delay after the given failed attempt (0-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_attempt() {
        let backoff = Backoff {
            base: Duration::from_millis(1_000),
            max: Duration::from_secs(30),
        };

        assert_eq!(backoff.delay(0), Duration::from_millis(1_000));
        assert_eq!(backoff.delay(1), Duration::from_millis(2_000));
        assert_eq!(backoff.delay(2), Duration::from_millis(4_000));
    }

    #[test]
    fn backoff_is_capped() {
        let backoff = Backoff {
            base: Duration::from_secs(10),
            max: Duration::from_secs(30),
        };

        assert_eq!(backoff.delay(5), Duration::from_secs(30));
        // Large attempt counts must not overflow.
        assert_eq!(backoff.delay(64), Duration::from_secs(30));
    }

    #[test]
    fn policy_defaults_match_the_configuration_surface() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 3);
        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(1_000));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(2_000));
    }

    #[test]
    fn attempts_are_clamped_to_at_least_one() {
        assert_eq!(RetryPolicy::new(0, Duration::from_millis(100)).attempts, 1);
    }
}

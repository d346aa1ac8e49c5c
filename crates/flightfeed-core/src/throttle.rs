//! Global throughput cap on task starts.

use std::num::NonZeroU32;
use std::sync::Arc;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Rate gate limiting how many task occurrences may start per second across
/// all sources, independent of per-task retry timing.
#[derive(Clone)]
pub struct ThroughputGate {
    limiter: Arc<DirectRateLimiter>,
}

impl ThroughputGate {
    pub fn per_second(jobs_per_second: u32) -> Self {
        let limit = NonZeroU32::new(jobs_per_second.max(1)).expect("limit is non-zero");
        Self {
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(limit))),
        }
    }

    /// Wait until the gate admits one more start.
    pub async fn acquire(&self) {
        self.limiter.until_ready().await;
    }

    /// Non-blocking probe; used by tests.
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_admits_up_to_the_per_second_quota() {
        let gate = ThroughputGate::per_second(2);

        assert!(gate.try_acquire());
        assert!(gate.try_acquire());
        assert!(!gate.try_acquire());
    }

    #[test]
    fn zero_quota_is_clamped_to_one() {
        let gate = ThroughputGate::per_second(0);
        assert!(gate.try_acquire());
    }
}

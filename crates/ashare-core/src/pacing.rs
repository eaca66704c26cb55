use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Inter-request pacing parameters: a minimum spacing between provider
/// calls and a cap on any single wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    pub min_interval: Duration,
    pub max_wait: Duration,
}

impl PacingPolicy {
    /// One request per second, the spacing the provider tolerates for
    /// anonymous history endpoints.
    pub const fn conservative_default() -> Self {
        Self {
            min_interval: Duration::from_secs(1),
            max_wait: Duration::from_secs(5),
        }
    }

    pub const fn with_min_interval(min_interval: Duration) -> Self {
        Self {
            min_interval,
            max_wait: Duration::from_secs(5),
        }
    }
}

/// Injectable pacing strategy for the fetch-orchestration loop.
pub trait RequestPacer: Send + Sync {
    /// Blocks until the next provider request may be issued.
    fn pace(&self);
}

/// Pacer that spaces requests at least `min_interval` apart using a
/// single-permit rate budget.
pub struct IntervalPacer {
    limiter: DirectRateLimiter,
    policy: PacingPolicy,
}

impl IntervalPacer {
    pub fn new(policy: PacingPolicy) -> Self {
        let period = policy.min_interval.max(Duration::from_millis(1));
        let quota = Quota::with_period(period)
            .expect("pacing interval is always greater than zero")
            .allow_burst(NonZeroU32::new(1).expect("single-permit burst is non-zero"));

        Self {
            limiter: RateLimiter::direct(quota),
            policy,
        }
    }

    /// Tries to acquire rate budget; when none is available returns the
    /// capped delay to wait before retrying.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        if self.limiter.check().is_ok() {
            return Ok(());
        }
        Err(self.policy.min_interval.min(self.policy.max_wait))
    }
}

impl RequestPacer for IntervalPacer {
    fn pace(&self) {
        while let Err(wait) = self.try_acquire() {
            thread::sleep(wait);
        }
    }
}

/// Pacer that never waits; used for deterministic tests and replay runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPacer;

impl RequestPacer for NoopPacer {
    fn pace(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_acquire_is_immediate() {
        let pacer = IntervalPacer::new(PacingPolicy::conservative_default());
        assert!(pacer.try_acquire().is_ok());
    }

    #[test]
    fn second_acquire_reports_a_capped_wait() {
        let policy = PacingPolicy {
            min_interval: Duration::from_secs(10),
            max_wait: Duration::from_secs(2),
        };
        let pacer = IntervalPacer::new(policy);

        assert!(pacer.try_acquire().is_ok());
        let wait = pacer.try_acquire().expect_err("budget must be exhausted");
        assert_eq!(wait, Duration::from_secs(2));
    }

    #[test]
    fn noop_pacer_never_blocks() {
        NoopPacer.pace();
    }
}

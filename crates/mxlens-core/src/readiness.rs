//! Bounded retry schedule for waiting on the host application global.

use core::time::Duration;

use crate::config::ReadinessPolicy;

/// Outcome of one readiness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessStep {
    /// The host is ready; start the overlay.
    Ready,
    /// Check again after the delay.
    Retry(Duration),
    /// Attempts exhausted; give up silently.
    GaveUp,
    /// The subscription was cancelled.
    Cancelled,
}

/// Retry state for one wait. Deterministic; the adapter owns the timers.
#[derive(Debug, Clone)]
pub struct ReadinessWait {
    policy: ReadinessPolicy,
    attempts: u32,
    cancelled: bool,
}

impl ReadinessWait {
    #[must_use]
    pub fn new(policy: ReadinessPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
            cancelled: false,
        }
    }

    /// Delay before retry number `attempt` (0-based), capped.
    #[must_use]
    pub fn delay_for(policy: &ReadinessPolicy, attempt: u32) -> Duration {
        let factor = policy.backoff.max(1.0).powi(attempt.min(64) as i32);
        let ms = (policy.initial_delay_ms as f64 * factor).min(policy.max_delay_ms as f64);
        Duration::from_millis(ms.max(0.0) as u64)
    }

    /// Record the result of a check and decide what happens next.
    pub fn observe(&mut self, host_ready: bool) -> ReadinessStep {
        if self.cancelled {
            return ReadinessStep::Cancelled;
        }
        if host_ready {
            return ReadinessStep::Ready;
        }
        if self.attempts >= self.policy.max_attempts {
            return ReadinessStep::GaveUp;
        }
        let delay = Self::delay_for(&self.policy, self.attempts);
        self.attempts += 1;
        ReadinessStep::Retry(delay)
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }
}

//! # Retry policy for supervised programs.
//!
//! [`RetryPolicy`] bounds how many times a supervisor launches its program per
//! selection and how long it pauses after a failed attempt.
//!
//! ```text
//! attempt 1 ─► fail ─► sleep(delay) ─► attempt 2 ─► fail ─► ... ─► attempt N ─► fail ─► give up
//!              └─► exit 0 at any attempt ─► stop, no further attempts
//! ```
//!
//! The delay is constant: there is only ever one supervised program, so there
//! is no herd to spread out.

use std::time::Duration;

/// Bounded retry policy: `attempts` launches at most, `delay` between failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy allowing `attempts` launches separated by `delay`.
    pub const fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    /// Maximum number of launches.
    #[inline]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Pause after a failed attempt.
    #[inline]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns the pause to take after failed attempt `attempt` (1-based), or
    /// `None` when the budget is spent and the supervisor must give up.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use tasker::RetryPolicy;
    ///
    /// let policy = RetryPolicy::new(3, Duration::from_secs(2));
    /// assert_eq!(policy.delay_after(1), Some(Duration::from_secs(2)));
    /// assert_eq!(policy.delay_after(2), Some(Duration::from_secs(2)));
    /// assert_eq!(policy.delay_after(3), None);
    /// ```
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        (attempt < self.attempts).then_some(self.delay)
    }
}

impl Default for RetryPolicy {
    /// Returns 5 attempts with a 2 second pause.
    fn default() -> Self {
        Self::new(
            crate::config::DEFAULT_RETRY_COUNT,
            crate::config::DEFAULT_RETRY_DELAY,
        )
    }
}

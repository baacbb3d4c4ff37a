//! Retry policy.
//!
//! ## Quick wiring
//! ```text
//! DaemonConfig { retry_count, retry_delay }
//!      └─► DaemonConfig::retry_policy() ─► RetryPolicy
//!           └─► core::supervisor::ProcessSupervisor uses delay_after(attempt)
//!               to decide sleep-and-retry or give up
//! ```

mod retry;

pub use retry::RetryPolicy;

//! Bounded retry for top-level pipeline calls.
//!
//! A single transient network or parsing failure must not abort a research
//! run that takes minutes end-to-end, so every public entry point runs
//! through [`retry`]. Internal sub-steps are NOT retried; they degrade to
//! empty results instead (see the error taxonomy in [`crate::error`]).
//!
//! The sleep function is injectable so retry timing is testable without
//! real delays.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Retry policy: total attempt count and the fixed delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first (minimum 1)
    pub max_attempts: u32,

    /// Fixed delay between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given attempts and delay.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

/// Run `operation` with bounded retries, sleeping via `tokio::time::sleep`.
///
/// On failure the last error is returned unchanged.
pub async fn retry<T, E, F, Fut>(policy: RetryPolicy, operation: F) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    retry_with_sleep(policy, operation, |d| tokio::time::sleep(d)).await
}

/// Run `operation` with bounded retries using a caller-supplied sleep.
///
/// This is the testable core: pass a no-op sleeper to exercise retry
/// counts deterministically without waiting.
pub async fn retry_with_sleep<T, E, F, Fut, S, SFut>(
    policy: RetryPolicy,
    mut operation: F,
    sleep: S,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    S: Fn(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    let attempts = policy.max_attempts.max(1);
    let mut last_err = None;

    for attempt in 1..=attempts {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt < attempts {
                    warn!(attempt, max_attempts = attempts, error = %err, "attempt failed, retrying");
                    sleep(policy.delay).await;
                } else {
                    warn!(attempt, max_attempts = attempts, error = %err, "attempt failed, giving up");
                }
                last_err = Some(err);
            }
        }
    }

    // attempts >= 1, so last_err is always set on this path
    Err(last_err.unwrap())
}

//! release::retry
//!
//! Explicit retry policy for gateway call sites.
//!
//! # Design
//!
//! A [`RetryPolicy`] is a plain value (max attempts, fixed delay) that a
//! caller applies to one operation together with a predicate over the
//! *successful* result. The operation is re-invoked while the predicate
//! marks the result as not-yet-usable; errors are returned immediately and
//! never retried. This replaces any notion of a cross-cutting retry
//! decorator - the policy is visible at the call site that needs it.

use std::future::Future;
use std::time::Duration;

/// Retry policy: fixed delay between a bounded number of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Create a policy. `max_attempts` counts the first call; it is clamped
    /// to at least one attempt.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// A policy that runs the operation exactly once.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Run `op`, re-invoking while `should_retry` flags the successful
    /// result, up to the attempt bound.
    ///
    /// The final result is returned as-is even when the predicate still
    /// flags it - exhausting attempts is not an error.
    pub async fn run<T, E, F, Fut, P>(&self, mut should_retry: P, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: FnMut(&T) -> bool,
    {
        let mut attempt = 1;
        loop {
            let result = op().await?;
            if attempt >= self.max_attempts || !should_retry(&result) {
                return Ok(result);
            }
            tokio::time::sleep(self.delay).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn stops_as_soon_as_result_is_acceptable() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(5, Duration::ZERO);
        let result: Result<u32, ()> = policy
            .run(
                |n| *n < 3,
                || {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    async move { Ok(n) }
                },
            )
            .await;
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn returns_last_result_when_attempts_exhausted() {
        let policy = RetryPolicy::new(3, Duration::ZERO);
        let result: Result<Vec<u32>, ()> = policy.run(|v: &Vec<u32>| v.is_empty(), || async { Ok(vec![]) }).await;
        assert_eq!(result.unwrap(), Vec::<u32>::new());
    }

    #[tokio::test]
    async fn errors_are_never_retried() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(5, Duration::ZERO);
        let result: Result<u32, &str> = policy
            .run(
                |_| true,
                || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Err("boom") }
                },
            )
            .await;
        assert_eq!(result.unwrap_err(), "boom");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn none_policy_runs_once() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, ()> = RetryPolicy::none()
            .run(
                |_| true,
                || {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    async move { Ok(n) }
                },
            )
            .await;
        assert_eq!(result.unwrap(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn zero_attempts_clamps_to_one() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy, RetryPolicy::new(1, Duration::ZERO));
    }
}

//! Bounded retry with exponential backoff.
//!
//! Generic over the wrapped operation: anything fallible and async. The
//! executor performs no I/O of its own beyond timed sleeps, holds no state,
//! and never swallows a terminal error — whatever the classifier marks
//! `Terminal` is returned unchanged on first observation.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Fixed backoff multiplier; delays double between attempts.
pub const BACKOFF_MULTIPLIER: u32 = 2;

/// Classification of an observed error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Transient infrastructure condition; retrying can change the outcome.
    Retryable,
    /// Retrying cannot change the outcome; propagate immediately.
    Terminal,
}

/// Retry policy: attempt bound and backoff base.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles for each attempt after.
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// The backoff delay after the given number of completed attempts.
    ///
    /// One completed attempt yields the initial delay, two yield twice
    /// that, and so on.
    #[must_use]
    pub fn backoff_after(&self, completed_attempts: u32) -> Duration {
        let exponent = completed_attempts.saturating_sub(1);
        self.initial_delay * BACKOFF_MULTIPLIER.saturating_pow(exponent)
    }
}

/// A failed retry sequence.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// The classifier marked the error terminal; it is returned unchanged.
    #[error("{0}")]
    Terminal(E),

    /// Every attempt failed with a retryable error; the last one is kept.
    #[error("Retries exhausted after {attempts} attempts: {last}")]
    Exhausted {
        /// How many attempts were made.
        attempts: u32,
        /// The last observed error.
        last: E,
    },
}

impl<E> RetryError<E> {
    /// The underlying error, regardless of how the sequence ended.
    pub fn into_inner(self) -> E {
        match self {
            RetryError::Terminal(e) | RetryError::Exhausted { last: e, .. } => e,
        }
    }

    /// Check if the retry budget was exhausted.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted { .. })
    }
}

/// Executes fallible operations under a [`RetryPolicy`].
///
/// Stateless and cheap to clone; safe to share across concurrent requests.
/// Backoff sleeps are per-call and never stall unrelated work.
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    /// Create an executor with the given policy.
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Run `operation` until it succeeds, fails terminally, or the attempt
    /// budget is spent.
    ///
    /// `classify` decides, per observed error, whether another attempt can
    /// help. Terminal errors propagate unchanged on first occurrence;
    /// retryable errors are retried with exponentially growing delays and
    /// the last one is returned annotated as exhausted.
    pub async fn execute<T, E, F, Fut, C>(
        &self,
        classify: C,
        mut operation: F,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        C: Fn(&E) -> ErrorClass,
        E: Display,
    {
        let mut attempt: u32 = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => match classify(&e) {
                    ErrorClass::Terminal => return Err(RetryError::Terminal(e)),
                    ErrorClass::Retryable => {
                        if attempt >= self.policy.max_attempts {
                            return Err(RetryError::Exhausted { attempts: attempt, last: e });
                        }

                        let delay = self.policy.backoff_after(attempt);
                        warn!(
                            attempt,
                            max_attempts = self.policy.max_attempts,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "Retryable failure; backing off"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug)]
    struct FakeError(&'static str);

    impl Display for FakeError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.0)
        }
    }

    fn always_retryable(_: &FakeError) -> ErrorClass {
        ErrorClass::Retryable
    }

    fn always_terminal(_: &FakeError) -> ErrorClass {
        ErrorClass::Terminal
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_returns_immediately() {
        let executor = RetryExecutor::default();
        let calls = AtomicU32::new(0);

        let result: Result<u32, RetryError<FakeError>> = executor
            .execute(always_retryable, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(7) }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_transient_invokes_exactly_max_attempts() {
        let executor = RetryExecutor::new(RetryPolicy {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
        });
        let calls = AtomicU32::new(0);

        let result: Result<(), RetryError<FakeError>> = executor
            .execute(always_retryable, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(FakeError("stale cache")) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match result.unwrap_err() {
            RetryError::Exhausted { attempts, last } => {
                assert_eq!(attempts, 3);
                assert_eq!(last.0, "stale cache");
            }
            RetryError::Terminal(_) => panic!("expected exhaustion"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_error_invokes_exactly_once() {
        let executor = RetryExecutor::default();
        let calls = AtomicU32::new(0);

        let result: Result<(), RetryError<FakeError>> = executor
            .execute(always_terminal, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(FakeError("duplicate email")) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result.unwrap_err(), RetryError::Terminal(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_spacing_is_exponential() {
        let initial = Duration::from_millis(250);
        let executor = RetryExecutor::new(RetryPolicy {
            max_attempts: 3,
            initial_delay: initial,
        });

        let start = tokio::time::Instant::now();
        let result: Result<(), RetryError<FakeError>> = executor
            .execute(always_retryable, || async { Err(FakeError("stale")) })
            .await;

        // Two inter-attempt delays: d then 2d.
        assert_eq!(start.elapsed(), initial * 3);
        assert!(result.unwrap_err().is_exhausted());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_then_success_stops_retrying() {
        let executor = RetryExecutor::new(RetryPolicy {
            max_attempts: 3,
            initial_delay: Duration::from_millis(50),
        });
        let calls = AtomicU32::new(0);

        let result: Result<u32, RetryError<FakeError>> = executor
            .execute(always_retryable, || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(FakeError("stale"))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_backoff_after_doubles() {
        let policy = RetryPolicy {
            max_attempts: 4,
            initial_delay: Duration::from_secs(1),
        };
        assert_eq!(policy.backoff_after(1), Duration::from_secs(1));
        assert_eq!(policy.backoff_after(2), Duration::from_secs(2));
        assert_eq!(policy.backoff_after(3), Duration::from_secs(4));
    }

    #[test]
    fn test_into_inner_unwraps_both_shapes() {
        let terminal: RetryError<FakeError> = RetryError::Terminal(FakeError("a"));
        assert_eq!(terminal.into_inner().0, "a");

        let exhausted: RetryError<FakeError> = RetryError::Exhausted {
            attempts: 3,
            last: FakeError("b"),
        };
        assert_eq!(exhausted.into_inner().0, "b");
    }
}

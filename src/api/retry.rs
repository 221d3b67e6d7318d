//! Retry policy
//!
//! The admin page never retries on its own; a policy with more than one attempt has
//! to be configured explicitly. Only transport failures are retried, since an
//! application error is the backend's answer. Callers only run idempotent requests
//! (list fetches, deletes) through a policy; uploads are sent once.

use std::future::Future;
use std::time::Duration;

use super::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl RetryPolicy {
    /// `max_attempts` counts the first attempt; zero is treated as one
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Single attempt, no retry
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before attempt number `attempt` (1-based); the first attempt never waits
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let exponent = (attempt - 2).min(16);
        self.base_delay.saturating_mul(2u32.pow(exponent))
    }

    /// Run `op` until it succeeds, fails with a non-transport error, or attempts run out
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut attempt = 1;
        loop {
            let delay = self.delay_before(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            match op().await {
                Err(e) if e.is_transport() && attempt < self.max_attempts => {
                    tracing::warn!(
                        operation,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Request failed, retrying"
                    );
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_delay_schedule() {
        let policy = RetryPolicy::new(5, Duration::from_millis(100));
        assert_eq!(policy.delay_before(1), Duration::ZERO);
        assert_eq!(policy.delay_before(2), Duration::from_millis(100));
        assert_eq!(policy.delay_before(3), Duration::from_millis(200));
        assert_eq!(policy.delay_before(4), Duration::from_millis(400));
    }

    #[test]
    fn test_zero_attempts_means_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
        assert_eq!(RetryPolicy::default(), RetryPolicy::none());
    }

    #[tokio::test]
    async fn test_default_policy_does_not_retry() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), ApiError> = RetryPolicy::none()
            .run("test", move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(ApiError::Transport("down".into()))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transport_errors_retried_until_success() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = RetryPolicy::new(3, Duration::ZERO)
            .run("test", move || async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err(ApiError::Transport("reset".into()))
                } else {
                    Ok(n)
                }
            })
            .await;

        assert_eq!(result, Ok(3));
    }

    #[tokio::test]
    async fn test_application_errors_not_retried() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), ApiError> = RetryPolicy::new(5, Duration::ZERO)
            .run("test", move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(ApiError::Application {
                    status: 400,
                    message: None,
                })
            })
            .await;

        assert_eq!(result.unwrap_err().status(), Some(400));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

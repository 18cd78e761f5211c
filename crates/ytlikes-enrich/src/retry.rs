//! Retry with exponential back-off and jitter for batch lookups.
//!
//! [`RetryPolicy::delay_for`] is the pure schedule; [`retry_with_backoff`]
//! applies it around a fallible async lookup. Only errors for which
//! [`YoutubeError::is_transient`] holds are retried. Quota exhaustion and
//! rejected credentials are returned at once to protect the daily quota.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use ytlikes_youtube::YoutubeError;

/// Bounded exponential back-off schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per batch, including the first one. At least 1.
    pub max_attempts: u32,
    /// Delay after the first failed attempt; doubles after each later one.
    pub base_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1_000),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            ..Self::default()
        }
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    ///
    /// | Failed attempt | Delay (base 1 000 ms) |
    /// |----------------|-----------------------|
    /// | 1              | 1 000 ms              |
    /// | 2              | 2 000 ms              |
    /// | 3              | 4 000 ms              |
    ///
    /// Capped at [`RetryPolicy::max_delay`]. Attempt `0` is treated as `1`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(20);
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }

    /// Whether another attempt is allowed after `attempt` attempts have failed.
    #[must_use]
    pub fn allows_retry_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

/// Scales `delay` by a random factor in `[0.75, 1.25)`.
fn jittered(delay: Duration) -> Duration {
    delay.mul_f64(rand::random::<f64>() * 0.5 + 0.75)
}

/// Runs `operation` until it succeeds, fails with a non-transient error, the
/// policy's attempts run out, or `cancel` fires.
///
/// A `Retry-After` hint on a rate-limit response stretches the delay, still
/// capped by the policy. Cancellation never interrupts a request in flight;
/// it only prevents the next attempt, in which case the last error is
/// returned.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    label: &str,
    mut operation: F,
) -> Result<T, YoutubeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, YoutubeError>>,
{
    let mut attempt = 1u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_transient()
                    || !policy.allows_retry_after(attempt)
                    || cancel.is_cancelled()
                {
                    return Err(err);
                }

                let mut delay = jittered(policy.delay_for(attempt));
                if let YoutubeError::RateLimited {
                    retry_after_secs: Some(secs),
                    ..
                } = &err
                {
                    delay = delay.max(Duration::from_secs(*secs)).min(policy.max_delay);
                }

                tracing::warn!(
                    batch = label,
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "transient YouTube error, retrying after back-off"
                );

                tokio::select! {
                    () = cancel.cancelled() => return Err(err),
                    () = tokio::time::sleep(delay) => {}
                }
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn no_delay(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::ZERO)
    }

    fn rate_limited() -> YoutubeError {
        YoutubeError::RateLimited {
            status: 429,
            retry_after_secs: None,
        }
    }

    #[test]
    fn delay_doubles_per_attempt() {
        let policy = RetryPolicy::new(5, Duration::from_millis(1_000));
        assert_eq!(policy.delay_for(1), Duration::from_millis(1_000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2_000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(4_000));
    }

    #[test]
    fn delay_is_capped() {
        let policy = RetryPolicy::new(50, Duration::from_secs(10));
        assert_eq!(policy.delay_for(10), Duration::from_secs(60));
        assert_eq!(policy.delay_for(u32::MAX), Duration::from_secs(60));
    }

    #[test]
    fn attempt_zero_is_treated_as_first() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), policy.delay_for(1));
    }

    #[test]
    fn zero_attempts_is_clamped_to_one() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.max_attempts, 1);
        assert!(!policy.allows_retry_after(1));
    }

    #[test]
    fn jitter_stays_within_a_quarter() {
        let base = Duration::from_millis(1_000);
        for _ in 0..100 {
            let d = jittered(base);
            assert!(d >= Duration::from_millis(750) && d < Duration::from_millis(1_250));
        }
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(&no_delay(3), &CancellationToken::new(), "t", || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, YoutubeError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(&no_delay(3), &CancellationToken::new(), "t", || {
            let c = Arc::clone(&c);
            async move {
                if c.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(rate_limited())
                } else {
                    Ok::<u32, YoutubeError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(&no_delay(3), &CancellationToken::new(), "t", || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(rate_limited())
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3, "3 attempts in total");
        assert!(matches!(result, Err(YoutubeError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn does_not_retry_quota_exceeded() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(&no_delay(3), &CancellationToken::new(), "t", || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(YoutubeError::QuotaExceeded("daily".to_owned()))
            }
        })
        .await;
        assert_eq!(
            calls.load(Ordering::SeqCst),
            1,
            "QuotaExceeded must not be retried"
        );
        assert!(matches!(result, Err(YoutubeError::QuotaExceeded(_))));
    }

    #[tokio::test]
    async fn cancellation_stops_further_attempts() {
        let cancel = CancellationToken::new();
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let token = cancel.clone();
        let result = retry_with_backoff(&no_delay(5), &cancel, "t", || {
            let c = Arc::clone(&c);
            let token = token.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                token.cancel();
                Err::<u32, _>(rate_limited())
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn honours_retry_after_hint() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let started = tokio::time::Instant::now();
        let result = retry_with_backoff(&no_delay(2), &CancellationToken::new(), "t", || {
            let c = Arc::clone(&c);
            async move {
                if c.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(YoutubeError::RateLimited {
                        status: 429,
                        retry_after_secs: Some(5),
                    })
                } else {
                    Ok::<u32, YoutubeError>(1)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 1);
        assert!(started.elapsed() >= Duration::from_secs(5));
    }
}

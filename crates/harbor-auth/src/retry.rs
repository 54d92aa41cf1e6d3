use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use harbor_config::SessionConfig;

/// How many times to try an operation and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero behaves as one.
    pub attempts: u32,
    /// Wait after failed attempt `n` is `n * step`.
    pub step: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub const fn linear(attempts: u32, step: Duration) -> Self {
        Self { attempts, step }
    }

    /// Single attempt, no waiting.
    #[must_use]
    pub const fn once() -> Self {
        Self::linear(1, Duration::ZERO)
    }

    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::linear(
            config.profile_fetch_attempts,
            Duration::from_millis(config.backoff_step_ms),
        )
    }

    /// Delay after the given failed attempt (1-based).
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.step.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::linear(3, Duration::from_secs(1))
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// runs out of attempts. The closure receives the 1-based attempt number.
///
/// # Errors
///
/// Returns the last error produced by `operation`.
pub async fn retry<T, E, F, Fut, R>(
    policy: &RetryPolicy,
    mut operation: F,
    is_retryable: R,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
    E: Display,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < attempts && is_retryable(&error) => {
                let delay = policy.delay_after(attempt);
                tracing::debug!(
                    attempt,
                    %error,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "attempt failed; retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Total attempts (first try included) before an error is final.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Wait before retry N (1-based): 3 s, 5 s, 10 s.
pub const DEFAULT_RETRY_DELAYS: [Duration; 3] = [
    Duration::from_secs(3),
    Duration::from_secs(5),
    Duration::from_secs(10),
];

/// One scheduled retry, as logged before the wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryAttempt {
    /// The attempt that just failed (1-based).
    pub attempt_number: u32,
    pub max_attempts: u32,
    pub delay: Duration,
}

/// Bounded retry with a fixed, attempt-indexed delay table.
///
/// No jitter and no computed backoff: the wait after attempt N is
/// `delays[N - 1]` (the last entry repeats if the table is short). The
/// final attempt's error is returned as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delays: Vec<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delays: DEFAULT_RETRY_DELAYS.to_vec(),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy; `max_attempts` is at least 1.
    pub fn new(max_attempts: u32, delays: Vec<Duration>) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delays,
        }
    }

    /// A policy that never retries.
    pub fn once() -> Self {
        Self::new(1, Vec::new())
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Wait after the failed attempt `attempt` (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let idx = attempt.saturating_sub(1) as usize;
        self.delays
            .get(idx)
            .or(self.delays.last())
            .copied()
            .unwrap_or(Duration::ZERO)
    }

    /// Runs `op` until it succeeds or `max_attempts` is reached.
    ///
    /// `operation` names the call in the pre-retry warning.
    pub async fn run<T, E, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let mut attempt = 1;
        loop {
            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if attempt >= self.max_attempts {
                return Err(err);
            }

            let retry = RetryAttempt {
                attempt_number: attempt,
                max_attempts: self.max_attempts,
                delay: self.delay_for_attempt(attempt),
            };
            warn!(
                operation,
                attempt = retry.attempt_number,
                max_attempts = retry.max_attempts,
                delay_secs = retry.delay.as_secs_f64(),
                error = %err,
                "attempt failed, retrying"
            );
            tokio::time::sleep(retry.delay).await;
            attempt += 1;
        }
    }
}

//! Bounded retry for transient upstream failures

use std::time::Duration;

use crate::errors::Result;

/// Fixed-interval retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one (at least 1)
    pub attempts: u32,
    /// Delay between consecutive attempts
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn fixed(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// Single attempt, no retries
    pub fn none() -> Self {
        Self::fixed(1, Duration::ZERO)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempts are exhausted. The last error is returned unchanged.
    ///
    /// `op` receives the 1-based attempt number.
    pub fn run<T, F>(&self, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Result<T>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.attempts => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.attempts,
                        delay_ms = self.delay.as_millis() as u64,
                        error = %err,
                        "transient failure, retrying"
                    );
                    if !self.delay.is_zero() {
                        std::thread::sleep(self.delay);
                    }
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(3, Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{RankError, RankErrorKind};

    #[test]
    fn test_succeeds_after_transient_failure() {
        let policy = RetryPolicy::fixed(3, Duration::ZERO);
        let mut calls = 0;

        let result = policy.run(|attempt| {
            calls += 1;
            if attempt == 1 {
                Err(RankError::new(RankErrorKind::SourceUnavailable))
            } else {
                Ok(attempt)
            }
        });

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_gives_up_after_bound() {
        let policy = RetryPolicy::fixed(3, Duration::ZERO);
        let mut calls = 0;

        let result: Result<()> = policy.run(|_| {
            calls += 1;
            Err(RankError::new(RankErrorKind::SourceUnavailable))
        });

        assert_eq!(result.unwrap_err().kind(), RankErrorKind::SourceUnavailable);
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_non_retryable_fails_immediately() {
        let policy = RetryPolicy::fixed(5, Duration::ZERO);
        let mut calls = 0;

        let result: Result<()> = policy.run(|_| {
            calls += 1;
            Err(RankError::new(RankErrorKind::MalformedData))
        });

        assert_eq!(result.unwrap_err().kind(), RankErrorKind::MalformedData);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_zero_attempts_is_clamped_to_one() {
        assert_eq!(RetryPolicy::fixed(0, Duration::ZERO).attempts, 1);
    }
}

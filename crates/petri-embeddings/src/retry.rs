//! Bounded retry with exponential backoff for transient provider failures.

use std::thread;
use std::time::Duration;

use tracing::warn;

use petri_core::errors::EmbeddingError;

/// Retry parameters: attempt cap and base backoff delay.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Run `op`, retrying transient failures with exponential backoff
    /// (base, 2·base, 4·base, ...). Non-transient errors surface
    /// immediately; exhaustion surfaces `RetriesExhausted`.
    pub fn run<T, F>(&self, mut op: F) -> Result<T, EmbeddingError>
    where
        F: FnMut() -> Result<T, EmbeddingError>,
    {
        let mut last_error: Option<EmbeddingError> = None;
        for attempt in 0..self.max_attempts {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() => {
                    warn!(attempt = attempt + 1, error = %e, "transient embedding failure");
                    last_error = Some(e);
                    if attempt + 1 < self.max_attempts {
                        thread::sleep(self.base_delay * 2u32.pow(attempt));
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Err(EmbeddingError::RetriesExhausted {
            attempts: self.max_attempts,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(200))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn transient() -> EmbeddingError {
        EmbeddingError::ProviderUnavailable {
            provider: "test".to_string(),
            reason: "flaky".to_string(),
        }
    }

    #[test]
    fn success_on_first_attempt() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let result: Result<u32, _> = policy.run(|| Ok(42));
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn retries_transient_then_succeeds() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let calls = Cell::new(0u32);
        let result = policy.run(|| {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(transient())
            } else {
                Ok("done")
            }
        });
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn exhaustion_surfaces_retries_exhausted() {
        let policy = RetryPolicy::new(2, Duration::from_millis(1));
        let result: Result<(), _> = policy.run(|| Err(transient()));
        assert!(matches!(
            result,
            Err(EmbeddingError::RetriesExhausted { attempts: 2, .. })
        ));
    }

    #[test]
    fn non_transient_fails_immediately() {
        let policy = RetryPolicy::new(5, Duration::from_millis(1));
        let calls = Cell::new(0u32);
        let result: Result<(), _> = policy.run(|| {
            calls.set(calls.get() + 1);
            Err(EmbeddingError::DimensionMismatch {
                expected: 10,
                actual: 5,
            })
        });
        assert!(matches!(
            result,
            Err(EmbeddingError::DimensionMismatch { .. })
        ));
        assert_eq!(calls.get(), 1);
    }
}

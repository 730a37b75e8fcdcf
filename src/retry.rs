//! Bounded retry against a flaky external resource.
//!
//! A fixed attempt bound with a fixed inter-attempt delay and a caller-
//! supplied retryable-vs-fatal classifier. Encapsulated here rather than as
//! ad hoc loops so the bound and delay are independently testable.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// A bounded retry policy: at most `max_attempts` total attempts, with
/// `delay` between consecutive attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

/// Why a retried operation ultimately failed.
#[derive(Debug)]
pub enum RetryError<E> {
    /// The classifier marked the error non-retryable; no further attempts
    /// were made.
    Fatal { attempts: u32, error: E },

    /// Every attempt failed with a retryable error.
    Exhausted { attempts: u32, last_error: E },
}

impl<E> RetryError<E> {
    /// Attempts actually issued before giving up.
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Fatal { attempts, .. } | RetryError::Exhausted { attempts, .. } => {
                *attempts
            }
        }
    }

    /// The terminal error.
    pub fn into_error(self) -> E {
        match self {
            RetryError::Fatal { error, .. } => error,
            RetryError::Exhausted { last_error, .. } => last_error,
        }
    }
}

impl RetryPolicy {
    /// Create a policy. `max_attempts` includes the first attempt and is
    /// clamped to at least 1.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// The attempt bound.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `op` until it succeeds, fails fatally, or the bound is reached.
    ///
    /// `retryable` classifies errors; a non-retryable error stops
    /// immediately. The delay is applied between attempts, not after the
    /// last one.
    pub async fn run<T, E, Fut, Op, Cls>(&self, mut op: Op, retryable: Cls) -> Result<T, RetryError<E>>
    where
        Op: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        Cls: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(error) if !retryable(&error) => {
                    return Err(RetryError::Fatal {
                        attempts: attempt,
                        error,
                    });
                }
                Err(error) if attempt >= self.max_attempts => {
                    return Err(RetryError::Exhausted {
                        attempts: attempt,
                        last_error: error,
                    });
                }
                Err(error) => {
                    debug!(
                        "retryable failure (attempt {}/{}): {}",
                        attempt, self.max_attempts, error
                    );
                    tokio::time::sleep(self.delay).await;
                }
            }
        }
    }
}

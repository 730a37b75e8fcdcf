//! Bounded poll for the offer state becoming readable after a mutation.

use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::AbortReason;
use crate::traits::ContentSession;
use crate::types::RunConfig;

/// Outcome of a stabilization wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The offer indicator became readable.
    Ready,

    /// The timeout elapsed first. Recoverable: the caller skips extraction
    /// for the current combination.
    TimedOut {
        /// How long was actually waited.
        waited_ms: u64,
    },
}

/// Polls the session until the offer is ready, never blocking past the
/// configured timeout.
#[derive(Debug, Clone, Copy)]
pub struct StabilizationWaiter {
    timeout: Duration,
    poll_interval: Duration,
}

impl StabilizationWaiter {
    /// Build a waiter from the run configuration.
    pub fn new(config: &RunConfig) -> Self {
        Self {
            timeout: config.stabilization_timeout(),
            poll_interval: config.poll_interval(),
        }
    }

    /// Poll `offer_ready` at the configured minimum interval until it
    /// reports true or the timeout elapses.
    ///
    /// Transient poll errors count as not-ready; only a lost session is an
    /// error, and a timeout is an expected outcome, not a failure.
    pub async fn wait_stable<S: ContentSession>(
        &self,
        session: &S,
    ) -> Result<WaitOutcome, AbortReason> {
        let started = Instant::now();
        let deadline = started + self.timeout;

        loop {
            match session.offer_ready().await {
                Ok(true) => return Ok(WaitOutcome::Ready),
                Ok(false) => {}
                Err(e) if e.is_fatal() => {
                    return Err(AbortReason::SessionLost(e.to_string()));
                }
                Err(e) => debug!("readiness poll failed, treating as not ready: {}", e),
            }

            let now = Instant::now();
            if now >= deadline {
                let waited_ms = started.elapsed().as_millis() as u64;
                debug!("offer did not stabilize within {}ms", waited_ms);
                return Ok(WaitOutcome::TimedOut { waited_ms });
            }

            // Never sleep past the deadline.
            sleep(self.poll_interval.min(deadline - now)).await;
        }
    }
}

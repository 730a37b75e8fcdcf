//! Applying and clearing selections against the session.
//!
//! Handles are never reused across calls: every attempt re-resolves the
//! option by its stable identifier before acting, because any prior mutation
//! may have silently invalidated whatever the session handed out before.

use tracing::{debug, warn};

use crate::error::{AbortReason, CombinationFailure, SessionError};
use crate::retry::{RetryError, RetryPolicy};
use crate::traits::ContentSession;
use crate::types::{FacetOption, RunConfig};

/// Failure of an apply/clear operation, split by scope.
#[derive(Debug)]
pub enum ControlError {
    /// Combination-scoped: abandon the current combination, keep going.
    Failed(CombinationFailure),

    /// Run-fatal: the session is gone.
    Fatal(AbortReason),
}

/// Applies and clears option selections with bounded staleness retry.
#[derive(Debug, Clone)]
pub struct SelectionController {
    policy: RetryPolicy,
}

impl SelectionController {
    /// Build a controller from the run configuration.
    pub fn new(config: &RunConfig) -> Self {
        Self {
            policy: RetryPolicy::new(config.max_select_attempts, config.retry_delay()),
        }
    }

    /// Select `option` within `dimension`.
    ///
    /// Each attempt re-resolves a current handle: the dimension's options are
    /// re-listed and the stable id must still be present before the select
    /// is issued. Stale and transient failures are retried up to the
    /// configured bound; an id that is genuinely gone is not retried.
    /// Exhaustion yields `SelectionFailed` and abandons the combination,
    /// never the run.
    pub async fn apply<S: ContentSession>(
        &self,
        session: &S,
        dimension: &str,
        option: &FacetOption,
    ) -> Result<(), ControlError> {
        let option_id = option.id.clone();
        let attempt = move || {
            let option_id = option_id.clone();
            async move {
                // Fresh resolution by stable id; never a cached handle.
                let options = session.list_options(dimension).await?;
                if !options.iter().any(|o| o.id == option_id) {
                    return Err(SessionError::NotFound(format!(
                        "{dimension} option {option_id}"
                    )));
                }
                session.select_option(&option_id).await
            }
        };

        match self.policy.run(attempt, SessionError::is_retryable).await {
            Ok(()) => {
                debug!("selected {}={}", dimension, option.label);
                Ok(())
            }
            Err(retry_err) => {
                let attempts = retry_err.attempts();
                match retry_err {
                    RetryError::Fatal { error, .. } if error.is_fatal() => {
                        Err(ControlError::Fatal(AbortReason::SessionLost(
                            error.to_string(),
                        )))
                    }
                    other => {
                        warn!(
                            "could not select {}={} after {} attempts: {}",
                            dimension,
                            option.label,
                            attempts,
                            other.into_error()
                        );
                        Err(ControlError::Failed(CombinationFailure::SelectionFailed {
                            dimension: dimension.to_string(),
                            option_id: option.id.clone(),
                            attempts,
                        }))
                    }
                }
            }
        }
    }

    /// Deselect every currently active selection.
    ///
    /// Deliberately broader than "what this run selected": the source may
    /// carry over selections the run did not make, and the invariant the
    /// scheduler depends on is that nothing is active before the next
    /// combination begins. Each deselect is independent; one failing is
    /// logged and does not stop the rest.
    pub async fn clear_all<S: ContentSession>(&self, session: &S) -> Result<(), AbortReason> {
        let active = match self
            .policy
            .run(move || session.active_selections(), SessionError::is_retryable)
            .await
        {
            Ok(ids) => ids,
            Err(retry_err) => {
                let error = retry_err.into_error();
                if error.is_fatal() {
                    return Err(AbortReason::SessionLost(error.to_string()));
                }
                warn!("could not list active selections: {}", error);
                return Ok(());
            }
        };

        for id in &active {
            match session.deselect_option(id).await {
                Ok(()) => debug!("deselected {}", id),
                Err(e) if e.is_fatal() => {
                    return Err(AbortReason::SessionLost(e.to_string()));
                }
                Err(e) => warn!("failed to deselect {}: {}", id, e),
            }
        }

        Ok(())
    }
}

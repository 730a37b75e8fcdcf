//! Typed errors for the variant-extraction library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! The taxonomy follows the scopes errors live at:
//! - [`SessionError`] — outcomes of individual content-session round trips.
//!   `Stale` and `Transient` are retried inside the selection controller and
//!   never escape it; `Lost` is always run-fatal.
//! - [`CombinationFailure`] — recoverable at combination scope; recorded in
//!   the result sequence, never thrown, traversal continues.
//! - [`AbortReason`] — run-fatal; the traversal stops but results accumulated
//!   so far are preserved in the report.

use thiserror::Error;

/// Errors reported by a [`ContentSession`](crate::traits::ContentSession)
/// round trip.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// A previously valid reference was invalidated by a mutation.
    #[error("stale reference: {0}")]
    Stale(String),

    /// The requested element does not exist in the session.
    #[error("not found: {0}")]
    NotFound(String),

    /// A transient condition; the same call may succeed if retried.
    #[error("transient session error: {0}")]
    Transient(String),

    /// The session itself is gone (crashed, disconnected, closed).
    #[error("session lost: {0}")]
    Lost(String),
}

impl SessionError {
    /// Whether a fresh attempt at the same operation can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SessionError::Stale(_) | SessionError::Transient(_))
    }

    /// Whether the session is unusable for the remainder of the run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionError::Lost(_))
    }
}

/// Why a single combination yielded no snapshot.
///
/// These are recorded in [`CombinationResult`](crate::types::CombinationResult)
/// entries rather than propagated; a failure on combination *k* never affects
/// combination *k+1*.
#[derive(Debug, Clone, Error)]
pub enum CombinationFailure {
    /// An option could not be selected within the retry bound.
    #[error("selection failed for {dimension}={option_id} after {attempts} attempts")]
    SelectionFailed {
        dimension: String,
        option_id: String,
        attempts: u32,
    },

    /// The offer state never became readable within the timeout.
    #[error("offer did not stabilize within {waited_ms}ms")]
    StabilizationTimeout { waited_ms: u64 },

    /// The offer was absent or missing required fields.
    #[error("incomplete snapshot, missing: {}", missing.join(", "))]
    IncompleteSnapshot { missing: Vec<String> },
}

/// Why a traversal stopped before covering every combination.
#[derive(Debug, Clone, Error)]
pub enum AbortReason {
    /// No dimensions could be read from the session at all.
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// The session became unusable mid-traversal.
    #[error("session lost: {0}")]
    SessionLost(String),

    /// Cancellation was requested; honored at a combination boundary.
    #[error("run cancelled")]
    Cancelled,
}

/// Errors reported by a [`Navigator`](crate::traits::Navigator).
#[derive(Debug, Error)]
pub enum NavigationError {
    /// The product listing could not be read.
    #[error("product listing unavailable: {0}")]
    ListingUnavailable(String),

    /// A product page could not be opened.
    #[error("failed to open {url}: {reason}")]
    OpenFailed { url: String, reason: String },

    /// The underlying session is gone.
    #[error("session lost: {0}")]
    SessionLost(String),
}

/// Errors reported by a [`RecordSink`](crate::traits::RecordSink).
///
/// Sink failures are logged by the harvest loop and never stop the run.
#[derive(Debug, Error)]
#[error("record sink error: {0}")]
pub struct SinkError(pub String);

/// Result type alias for session round trips.
pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Result type alias for navigator operations.
pub type NavigationResult<T> = std::result::Result<T, NavigationError>;

/// Result type alias for record-sink operations.
pub type SinkResult<T> = std::result::Result<T, SinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(SessionError::Stale("btn".into()).is_retryable());
        assert!(SessionError::Transient("busy".into()).is_retryable());
        assert!(!SessionError::NotFound("id-9".into()).is_retryable());
        assert!(!SessionError::Lost("closed".into()).is_retryable());
    }

    #[test]
    fn test_only_lost_is_fatal() {
        assert!(SessionError::Lost("closed".into()).is_fatal());
        assert!(!SessionError::Stale("btn".into()).is_fatal());
        assert!(!SessionError::NotFound("id-9".into()).is_fatal());
    }

    #[test]
    fn test_failure_display_names_missing_fields() {
        let failure = CombinationFailure::IncompleteSnapshot {
            missing: vec!["price".to_string(), "currency".to_string()],
        };
        assert_eq!(
            failure.to_string(),
            "incomplete snapshot, missing: price, currency"
        );
    }
}

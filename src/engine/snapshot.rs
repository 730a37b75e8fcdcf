//! Reading and validating the top-ranked offer.

use tracing::{debug, warn};

use crate::error::AbortReason;
use crate::traits::ContentSession;
use crate::types::OfferSnapshot;

/// Outcome of one snapshot attempt.
#[derive(Debug, Clone)]
pub enum SnapshotOutcome {
    /// Price and currency were present; snapshot materialized.
    Captured(OfferSnapshot),

    /// The offer was absent or missing required fields. Recoverable: the
    /// combination is recorded without a snapshot.
    Incomplete {
        /// Names of the required fields that could not be read.
        missing: Vec<String>,
    },
}

/// Reads the current top-ranked offer from the session.
///
/// Price and currency are required; seller and channel are read
/// opportunistically and may be absent without failing the snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotExtractor;

impl SnapshotExtractor {
    /// Create an extractor.
    pub fn new() -> Self {
        Self
    }

    /// Attempt to materialize a snapshot of the current offer state.
    pub async fn snapshot<S: ContentSession>(
        &self,
        session: &S,
    ) -> Result<SnapshotOutcome, AbortReason> {
        let raw = match session.read_top_offer().await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("no offer rendered for the current selection state");
                return Ok(SnapshotOutcome::Incomplete {
                    missing: vec!["offer".to_string()],
                });
            }
            Err(e) if e.is_fatal() => {
                return Err(AbortReason::SessionLost(e.to_string()));
            }
            Err(e) => {
                warn!("offer read failed: {}", e);
                return Ok(SnapshotOutcome::Incomplete {
                    missing: vec!["offer".to_string()],
                });
            }
        };

        match OfferSnapshot::from_raw(raw) {
            Ok(snapshot) => Ok(SnapshotOutcome::Captured(snapshot)),
            Err(missing) => {
                debug!("offer incomplete, missing {}", missing.join(", "));
                Ok(SnapshotOutcome::Incomplete { missing })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSession;
    use crate::types::RawOffer;

    #[tokio::test]
    async fn test_captures_complete_offer() {
        let session = MockSession::new().with_default_offer(
            RawOffer::new("1299.99", "AZN")
                .with_seller("Kontakt")
                .with_channel("kontakt.az"),
        );

        match SnapshotExtractor::new().snapshot(&session).await.unwrap() {
            SnapshotOutcome::Captured(snapshot) => {
                assert_eq!(snapshot.price, "1299.99");
                assert_eq!(snapshot.currency, "AZN");
                assert_eq!(snapshot.seller.as_deref(), Some("Kontakt"));
                assert_eq!(snapshot.channel.as_deref(), Some("kontakt.az"));
            }
            other => panic!("expected capture, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_optional_fields_may_be_absent() {
        let session = MockSession::new().with_default_offer(RawOffer::new("10", "AZN"));
        match SnapshotExtractor::new().snapshot(&session).await.unwrap() {
            SnapshotOutcome::Captured(snapshot) => {
                assert_eq!(snapshot.seller, None);
                assert_eq!(snapshot.channel, None);
            }
            other => panic!("expected capture, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_absent_offer_is_incomplete() {
        let session = MockSession::new();
        match SnapshotExtractor::new().snapshot(&session).await.unwrap() {
            SnapshotOutcome::Incomplete { missing } => assert_eq!(missing, vec!["offer"]),
            other => panic!("expected incomplete, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_currency_is_incomplete() {
        let raw = RawOffer {
            price: Some("10".to_string()),
            ..Default::default()
        };
        let session = MockSession::new().with_default_offer(raw);
        match SnapshotExtractor::new().snapshot(&session).await.unwrap() {
            SnapshotOutcome::Incomplete { missing } => assert_eq!(missing, vec!["currency"]),
            other => panic!("expected incomplete, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_lost_session_is_fatal() {
        let session = MockSession::new().lose_session();
        let err = SnapshotExtractor::new().snapshot(&session).await.unwrap_err();
        assert!(matches!(err, AbortReason::SessionLost(_)));
    }
}

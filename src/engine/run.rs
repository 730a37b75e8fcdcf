//! The per-product extraction run.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::catalog::read_catalog;
use crate::engine::scheduler::CombinationScheduler;
use crate::traits::ContentSession;
use crate::types::{RunConfig, RunStatus, TraversalReport};

/// The aggregate of one product's traversal.
///
/// Holds the session for the duration of the run; the session is borrowed
/// exclusively by construction, so it is released on every exit path when
/// the run ends. The catalog is read exactly once, then the scheduler
/// covers its full cartesian product.
pub struct ExtractionRun<'s, S: ContentSession> {
    session: &'s S,
    config: RunConfig,
    cancel: Option<CancellationToken>,
}

impl<'s, S: ContentSession> ExtractionRun<'s, S> {
    /// Create a run over a session positioned at a product page.
    pub fn new(session: &'s S, config: RunConfig) -> Self {
        Self {
            session,
            config,
            cancel: None,
        }
    }

    /// Honor a cancellation token at combination boundaries.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Execute the traversal: catalog read, then the full combination sweep.
    ///
    /// Never returns an error: fatal conditions are reported in the
    /// [`RunStatus`] and whatever results were accumulated before the abort
    /// are preserved in the report.
    pub async fn execute(self) -> TraversalReport {
        let run_id = Uuid::new_v4();

        let catalog = match read_catalog(self.session, &self.config.dimensions).await {
            Ok(catalog) => catalog,
            Err(abort) => {
                warn!("run {}: {}", run_id, abort);
                return TraversalReport {
                    run_id,
                    results: Vec::new(),
                    combinations_attempted: 0,
                    status: RunStatus::Aborted(abort),
                };
            }
        };

        let mut scheduler = CombinationScheduler::new(self.config);
        if let Some(token) = self.cancel {
            scheduler = scheduler.with_cancellation(token);
        }

        let report = scheduler.run(self.session, &catalog, run_id).await;
        info!(
            "run {}: {} snapshots from {} attempted combinations",
            run_id,
            report.snapshot_count(),
            report.combinations_attempted
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AbortReason;
    use crate::testing::MockSession;
    use crate::types::{FacetOption, RawOffer};

    fn config() -> RunConfig {
        RunConfig::default()
            .with_retry_delay_ms(1)
            .with_stabilization_timeout_ms(50)
            .with_poll_interval_ms(1)
    }

    #[tokio::test]
    async fn test_zero_dimension_product_yields_one_snapshot() {
        let session = MockSession::new().with_default_offer(RawOffer::new("999", "AZN"));

        let report = ExtractionRun::new(&session, config()).execute().await;
        assert!(report.status.is_completed());
        assert_eq!(report.combinations_attempted, 1);
        assert_eq!(report.snapshot_count(), 1);
        assert!(report.results[0].combination.is_empty());
    }

    #[tokio::test]
    async fn test_catalog_unavailable_aborts_with_empty_results() {
        let session = MockSession::new()
            .fail_listing("storage")
            .fail_listing("color");

        let report = ExtractionRun::new(&session, config()).execute().await;
        assert!(matches!(
            report.status,
            RunStatus::Aborted(AbortReason::CatalogUnavailable(_))
        ));
        assert_eq!(report.combinations_attempted, 0);
        assert!(report.results.is_empty());
    }

    #[tokio::test]
    async fn test_pre_cancelled_run_attempts_nothing() {
        let session = MockSession::new()
            .with_dimension("storage", vec![FacetOption::new("s1", "128 GB")])
            .with_default_offer(RawOffer::new("10", "AZN"));

        let token = CancellationToken::new();
        token.cancel();

        let report = ExtractionRun::new(&session, config())
            .with_cancellation(token)
            .execute()
            .await;
        assert!(matches!(
            report.status,
            RunStatus::Aborted(AbortReason::Cancelled)
        ));
        assert_eq!(report.combinations_attempted, 0);
    }
}

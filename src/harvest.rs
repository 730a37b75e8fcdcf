//! Multi-product harvest: visit each product, traverse it, hand the report
//! to the sink.
//!
//! Upstream navigation and downstream record building both live behind
//! traits; this loop only sequences them around the per-product
//! [`ExtractionRun`].

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use url::Url;

use crate::engine::ExtractionRun;
use crate::error::{AbortReason, NavigationError};
use crate::traits::{ContentSession, Navigator, RecordSink};
use crate::types::{HarvestConfig, RunStatus, TraversalReport};

/// A harvest could not start.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// The navigator could not supply the product list.
    #[error("failed to list products: {0}")]
    Listing(#[from] NavigationError),
}

/// Outcome of a multi-product harvest.
#[derive(Debug)]
pub struct HarvestSummary {
    /// Products for which a traversal was executed.
    pub products_visited: usize,

    /// Products skipped because they could not be opened.
    pub products_failed: usize,

    /// Snapshots extracted across all products.
    pub snapshots_extracted: usize,

    /// Per-product reports in visit order.
    pub reports: Vec<(Url, TraversalReport)>,
}

impl HarvestSummary {
    fn new() -> Self {
        Self {
            products_visited: 0,
            products_failed: 0,
            snapshots_extracted: 0,
            reports: Vec::new(),
        }
    }

    /// Whether every visited product completed its traversal and no product
    /// failed to open.
    pub fn is_success(&self) -> bool {
        self.products_failed == 0
            && self
                .reports
                .iter()
                .all(|(_, report)| report.status.is_completed())
    }
}

/// Harvest every product the navigator supplies.
pub async fn harvest<S, N, K>(
    session: &S,
    navigator: &N,
    sink: &K,
    config: &HarvestConfig,
) -> Result<HarvestSummary, HarvestError>
where
    S: ContentSession,
    N: Navigator,
    K: RecordSink,
{
    harvest_inner(session, navigator, sink, config, None).await
}

/// Like [`harvest`], honoring cancellation at product and combination
/// boundaries.
pub async fn harvest_with_cancellation<S, N, K>(
    session: &S,
    navigator: &N,
    sink: &K,
    config: &HarvestConfig,
    cancel: CancellationToken,
) -> Result<HarvestSummary, HarvestError>
where
    S: ContentSession,
    N: Navigator,
    K: RecordSink,
{
    harvest_inner(session, navigator, sink, config, Some(cancel)).await
}

async fn harvest_inner<S, N, K>(
    session: &S,
    navigator: &N,
    sink: &K,
    config: &HarvestConfig,
    cancel: Option<CancellationToken>,
) -> Result<HarvestSummary, HarvestError>
where
    S: ContentSession,
    N: Navigator,
    K: RecordSink,
{
    let mut addresses = navigator.product_addresses().await?;
    if let Some(max) = config.max_products {
        addresses.truncate(max);
    }
    let total = addresses.len();
    info!("harvesting {} products", total);

    let mut summary = HarvestSummary::new();

    for (i, address) in addresses.into_iter().enumerate() {
        if cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
            info!("harvest cancelled after {} products", summary.products_visited);
            break;
        }

        info!("product {}/{}: {}", i + 1, total, address);

        if let Err(e) = navigator.open_product(&address).await {
            error!("could not open {}: {}", address, e);
            summary.products_failed += 1;
            if matches!(e, NavigationError::SessionLost(_)) {
                break;
            }
            continue;
        }

        let mut run = ExtractionRun::new(session, config.run.clone());
        if let Some(token) = &cancel {
            run = run.with_cancellation(token.clone());
        }
        let report = run.execute().await;

        summary.products_visited += 1;
        summary.snapshots_extracted += report.snapshot_count();

        if let Err(e) = sink.record(&address, &report).await {
            warn!("sink rejected report for {}: {}", address, e);
        }

        let session_lost = matches!(
            report.status,
            RunStatus::Aborted(AbortReason::SessionLost(_))
        );
        summary.reports.push((address, report));

        if session_lost {
            error!("session lost, aborting harvest with partial results");
            break;
        }
    }

    info!(
        "harvest done: {} visited, {} failed, {} snapshots",
        summary.products_visited, summary.products_failed, summary.snapshots_extracted
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockNavigator, MockSession, RecordingSink};
    use crate::types::{FacetOption, RawOffer, RunConfig};

    fn config() -> HarvestConfig {
        HarvestConfig::new().with_run(
            RunConfig::default()
                .with_retry_delay_ms(1)
                .with_stabilization_timeout_ms(50)
                .with_poll_interval_ms(1),
        )
    }

    fn product(n: u32) -> Url {
        Url::parse(&format!("https://shop.example/p/{n}")).unwrap()
    }

    #[tokio::test]
    async fn test_every_product_reaches_the_sink() {
        let session = MockSession::new()
            .with_dimension("storage", vec![FacetOption::new("s1", "128 GB")])
            .with_default_offer(RawOffer::new("10", "AZN"));
        let navigator = MockNavigator::new().with_products([product(1), product(2)]);
        let sink = RecordingSink::new();

        let summary = harvest(&session, &navigator, &sink, &config())
            .await
            .unwrap();
        assert!(summary.is_success());
        assert_eq!(summary.products_visited, 2);
        assert_eq!(summary.snapshots_extracted, 2);
        assert_eq!(sink.records().len(), 2);
        assert_eq!(navigator.opened(), vec![product(1), product(2)]);
    }

    #[tokio::test]
    async fn test_unopenable_product_is_skipped_not_fatal() {
        let session = MockSession::new().with_default_offer(RawOffer::new("10", "AZN"));
        let navigator = MockNavigator::new()
            .with_products([product(1), product(2), product(3)])
            .fail_open(product(2));
        let sink = RecordingSink::new();

        let summary = harvest(&session, &navigator, &sink, &config())
            .await
            .unwrap();
        assert!(!summary.is_success());
        assert_eq!(summary.products_visited, 2);
        assert_eq!(summary.products_failed, 1);
        assert_eq!(sink.records().len(), 2);
    }

    #[tokio::test]
    async fn test_max_products_truncates_the_visit_list() {
        let session = MockSession::new().with_default_offer(RawOffer::new("10", "AZN"));
        let navigator =
            MockNavigator::new().with_products([product(1), product(2), product(3)]);
        let sink = RecordingSink::new();

        let summary = harvest(
            &session,
            &navigator,
            &sink,
            &config().with_max_products(2),
        )
        .await
        .unwrap();
        assert_eq!(summary.products_visited, 2);
    }

    #[tokio::test]
    async fn test_sink_failure_does_not_stop_the_harvest() {
        let session = MockSession::new().with_default_offer(RawOffer::new("10", "AZN"));
        let navigator = MockNavigator::new().with_products([product(1), product(2)]);
        let sink = RecordingSink::new().fail_all();

        let summary = harvest(&session, &navigator, &sink, &config())
            .await
            .unwrap();
        assert_eq!(summary.products_visited, 2);
        assert_eq!(summary.reports.len(), 2);
    }

    #[tokio::test]
    async fn test_listing_failure_fails_the_harvest() {
        let session = MockSession::new();
        let navigator = MockNavigator::new().fail_listing();
        let sink = RecordingSink::new();

        let result = harvest(&session, &navigator, &sink, &config()).await;
        assert!(matches!(result, Err(HarvestError::Listing(_))));
    }
}

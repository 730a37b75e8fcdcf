//! The record sink: downstream consumer of traversal reports.

use async_trait::async_trait;
use url::Url;

use crate::error::SinkResult;
use crate::types::TraversalReport;

/// Receives the ordered results of each product's traversal.
///
/// Labeling/categorizing attributes, assigning surrogate identifiers,
/// building normalized records, and persisting them all live behind this
/// seam. A sink failure is logged by the harvest loop and does not stop
/// the run.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Hand over one product's traversal report.
    async fn record(&self, product: &Url, report: &TraversalReport) -> SinkResult<()>;
}

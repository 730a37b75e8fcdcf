//! Traversal results: per-combination outcomes and the run-level report.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AbortReason, CombinationFailure};
use crate::types::combination::Combination;
use crate::types::offer::OfferSnapshot;

/// What one combination's cycle produced.
#[derive(Debug, Clone)]
pub enum CombinationOutcome {
    /// A complete snapshot was extracted.
    Extracted(OfferSnapshot),

    /// The combination was attempted but yielded no snapshot.
    Failed(CombinationFailure),
}

/// One combination paired with its outcome, in traversal order.
#[derive(Debug, Clone)]
pub struct CombinationResult {
    /// The attempted combination.
    pub combination: Combination,

    /// Snapshot or failure marker.
    pub outcome: CombinationOutcome,
}

impl CombinationResult {
    /// The snapshot, if extraction succeeded.
    pub fn snapshot(&self) -> Option<&OfferSnapshot> {
        match &self.outcome {
            CombinationOutcome::Extracted(snapshot) => Some(snapshot),
            CombinationOutcome::Failed(_) => None,
        }
    }

    /// The failure, if extraction did not produce a snapshot.
    pub fn failure(&self) -> Option<&CombinationFailure> {
        match &self.outcome {
            CombinationOutcome::Extracted(_) => None,
            CombinationOutcome::Failed(failure) => Some(failure),
        }
    }
}

/// How a traversal ended.
#[derive(Debug, Clone)]
pub enum RunStatus {
    /// Every combination was attempted.
    Completed,

    /// The run stopped early; accumulated results are preserved.
    Aborted(AbortReason),
}

impl RunStatus {
    /// Whether the traversal covered every combination.
    pub fn is_completed(&self) -> bool {
        matches!(self, RunStatus::Completed)
    }
}

/// The aggregate of one product's traversal.
#[derive(Debug, Clone)]
pub struct TraversalReport {
    /// Identifier for correlating log lines of one run.
    pub run_id: Uuid,

    /// Per-combination results in traversal order.
    pub results: Vec<CombinationResult>,

    /// Combinations whose cycle was started (equals the catalog's
    /// combination count when the run completes).
    pub combinations_attempted: usize,

    /// Completed, or aborted with partial results.
    pub status: RunStatus,
}

impl TraversalReport {
    /// Number of combinations that produced a snapshot.
    pub fn snapshot_count(&self) -> usize {
        self.results.iter().filter(|r| r.snapshot().is_some()).count()
    }

    /// Iterate the extracted snapshots in traversal order.
    pub fn snapshots(&self) -> impl Iterator<Item = (&Combination, &OfferSnapshot)> {
        self.results
            .iter()
            .filter_map(|r| r.snapshot().map(|s| (&r.combination, s)))
    }
}

/// Summary statistics for one traversal, for logging and sinks.
///
/// Serializable counterpart of [`TraversalReport`] without the outcome
/// payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalStats {
    pub run_id: Uuid,
    pub combinations_attempted: usize,
    pub snapshots_extracted: usize,
    pub completed: bool,
}

impl From<&TraversalReport> for TraversalStats {
    fn from(report: &TraversalReport) -> Self {
        Self {
            run_id: report.run_id,
            combinations_attempted: report.combinations_attempted,
            snapshots_extracted: report.snapshot_count(),
            completed: report.status.is_completed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::offer::RawOffer;

    fn extracted() -> CombinationResult {
        CombinationResult {
            combination: Combination::empty(),
            outcome: CombinationOutcome::Extracted(
                OfferSnapshot::from_raw(RawOffer::new("10", "AZN")).unwrap(),
            ),
        }
    }

    fn failed() -> CombinationResult {
        CombinationResult {
            combination: Combination::empty(),
            outcome: CombinationOutcome::Failed(CombinationFailure::StabilizationTimeout {
                waited_ms: 5000,
            }),
        }
    }

    #[test]
    fn test_snapshot_count_ignores_failures() {
        let report = TraversalReport {
            run_id: Uuid::new_v4(),
            results: vec![extracted(), failed(), extracted()],
            combinations_attempted: 3,
            status: RunStatus::Completed,
        };
        assert_eq!(report.snapshot_count(), 2);
        assert_eq!(report.snapshots().count(), 2);
    }

    #[test]
    fn test_stats_from_report() {
        let report = TraversalReport {
            run_id: Uuid::new_v4(),
            results: vec![extracted(), failed()],
            combinations_attempted: 2,
            status: RunStatus::Aborted(AbortReason::Cancelled),
        };
        let stats = TraversalStats::from(&report);
        assert_eq!(stats.combinations_attempted, 2);
        assert_eq!(stats.snapshots_extracted, 1);
        assert!(!stats.completed);
    }
}

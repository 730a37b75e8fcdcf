//! Cartesian traversal of the catalog and the per-combination cycle.
//!
//! The scheduler is the sole orchestrator: it drives SELECT → WAIT →
//! EXTRACT → CLEAR strictly sequentially, one combination at a time, and
//! never starts the next combination until the current one's clear step has
//! finished. Failures are isolated to the combination they occur in; only a
//! lost session (or cancellation, honored at combination boundaries only)
//! stops the traversal, and even then accumulated results are preserved.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::engine::selection::{ControlError, SelectionController};
use crate::engine::snapshot::{SnapshotExtractor, SnapshotOutcome};
use crate::engine::waiter::{StabilizationWaiter, WaitOutcome};
use crate::error::{AbortReason, CombinationFailure};
use crate::traits::ContentSession;
use crate::types::{
    Catalog, Combination, CombinationOutcome, CombinationResult, RunConfig, RunStatus,
    TraversalReport,
};

/// The ordered cartesian product of the catalog's options.
///
/// Dimensions are iterated in discovery order; the last-discovered dimension
/// varies fastest (odometer order). A catalog with no facets yields exactly
/// one empty combination.
pub fn combinations(catalog: &Catalog) -> Vec<Combination> {
    let dims: Vec<_> = catalog
        .dimensions
        .iter()
        .filter(|d| !d.options.is_empty())
        .collect();
    if dims.is_empty() {
        return vec![Combination::empty()];
    }

    let mut out = Vec::with_capacity(catalog.combination_count());
    let mut indices = vec![0usize; dims.len()];
    'odometer: loop {
        out.push(Combination::from_pairs(dims.iter().zip(&indices).map(
            |(d, &i)| (d.name.clone(), d.options[i].clone()),
        )));

        let mut pos = dims.len() - 1;
        loop {
            indices[pos] += 1;
            if indices[pos] < dims[pos].options.len() {
                break;
            }
            indices[pos] = 0;
            if pos == 0 {
                break 'odometer;
            }
            pos -= 1;
        }
    }
    out
}

/// What one combination's cycle left behind.
struct CycleEnd {
    outcome: Option<CombinationOutcome>,
    fatal: Option<AbortReason>,
}

/// Drives the full traversal for one catalog.
pub struct CombinationScheduler {
    config: RunConfig,
    cancel: Option<CancellationToken>,
}

impl CombinationScheduler {
    /// Create a scheduler.
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Honor a cancellation token, checked only between combinations so the
    /// session is never abandoned mid-mutation.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Traverse every combination of the catalog against the session.
    pub async fn run<S: ContentSession>(
        &self,
        session: &S,
        catalog: &Catalog,
        run_id: Uuid,
    ) -> TraversalReport {
        let controller = SelectionController::new(&self.config);
        let waiter = StabilizationWaiter::new(&self.config);
        let extractor = SnapshotExtractor::new();

        let plan = combinations(catalog);
        let total = plan.len();
        info!("run {}: traversing {} combinations", run_id, total);

        let mut results = Vec::with_capacity(total);
        let mut attempted = 0;
        let mut status = RunStatus::Completed;

        for (i, combination) in plan.into_iter().enumerate() {
            if self.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
                info!("run {}: cancelled after {} combinations", run_id, attempted);
                status = RunStatus::Aborted(AbortReason::Cancelled);
                break;
            }

            attempted += 1;
            debug!(
                "run {}: combination {}/{}: {}",
                run_id,
                i + 1,
                total,
                combination.describe()
            );

            let end = self
                .cycle(session, &controller, &waiter, &extractor, &combination)
                .await;

            if let Some(outcome) = end.outcome {
                results.push(CombinationResult {
                    combination,
                    outcome,
                });
            }
            if let Some(abort) = end.fatal {
                warn!("run {}: aborting traversal: {}", run_id, abort);
                status = RunStatus::Aborted(abort);
                break;
            }
        }

        TraversalReport {
            run_id,
            results,
            combinations_attempted: attempted,
            status,
        }
    }

    /// One combination's cycle: SELECT(d=1..n) → WAIT → EXTRACT → CLEAR.
    ///
    /// CLEAR is the unconditional terminal step of every cycle so the next
    /// combination starts from a clean state; the only exception is a lost
    /// session, which cannot be cleared and aborts the run instead.
    async fn cycle<S: ContentSession>(
        &self,
        session: &S,
        controller: &SelectionController,
        waiter: &StabilizationWaiter,
        extractor: &SnapshotExtractor,
        combination: &Combination,
    ) -> CycleEnd {
        let mut failure: Option<CombinationFailure> = None;

        // SELECT, in dimension order. Any failure jumps to CLEAR.
        let last = combination.len().saturating_sub(1);
        for (i, (dimension, option)) in combination.iter().enumerate() {
            match controller.apply(session, dimension, option).await {
                Ok(()) => {
                    // A dimension's selection may have to settle before the
                    // next dimension's options are valid. The final wait
                    // before EXTRACT is handled below, exactly once.
                    if self.config.settle_between_dimensions && i < last {
                        match waiter.wait_stable(session).await {
                            Ok(WaitOutcome::Ready) => {}
                            Ok(WaitOutcome::TimedOut { waited_ms }) => {
                                failure =
                                    Some(CombinationFailure::StabilizationTimeout { waited_ms });
                                break;
                            }
                            Err(abort) => {
                                return CycleEnd {
                                    outcome: None,
                                    fatal: Some(abort),
                                };
                            }
                        }
                    }
                }
                Err(ControlError::Failed(f)) => {
                    failure = Some(f);
                    break;
                }
                Err(ControlError::Fatal(abort)) => {
                    return CycleEnd {
                        outcome: None,
                        fatal: Some(abort),
                    };
                }
            }
        }

        // WAIT once after the full selection set, then EXTRACT.
        let mut snapshot = None;
        if failure.is_none() {
            match waiter.wait_stable(session).await {
                Ok(WaitOutcome::Ready) => {
                    match extractor.snapshot(session).await {
                        Ok(SnapshotOutcome::Captured(s)) => snapshot = Some(s),
                        Ok(SnapshotOutcome::Incomplete { missing }) => {
                            failure = Some(CombinationFailure::IncompleteSnapshot { missing });
                        }
                        Err(abort) => {
                            return CycleEnd {
                                outcome: None,
                                fatal: Some(abort),
                            };
                        }
                    }
                }
                Ok(WaitOutcome::TimedOut { waited_ms }) => {
                    failure = Some(CombinationFailure::StabilizationTimeout { waited_ms });
                }
                Err(abort) => {
                    return CycleEnd {
                        outcome: None,
                        fatal: Some(abort),
                    };
                }
            }
        }

        let outcome = match (snapshot, failure) {
            (Some(s), _) => CombinationOutcome::Extracted(s),
            (None, Some(f)) => CombinationOutcome::Failed(f),
            // Unreachable: no snapshot implies a recorded failure.
            (None, None) => CombinationOutcome::Failed(CombinationFailure::IncompleteSnapshot {
                missing: vec!["offer".to_string()],
            }),
        };

        // CLEAR, regardless of how the cycle went.
        let fatal = match controller.clear_all(session).await {
            Ok(()) => None,
            Err(abort) => Some(abort),
        };

        CycleEnd {
            outcome: Some(outcome),
            fatal,
        }
    }
}

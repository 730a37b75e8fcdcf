//! The traversal engine.
//!
//! Five components, orchestrated by the scheduler:
//! - [`catalog`] - one-shot read of dimensions and options
//! - [`selection`] - apply/clear selections with staleness retry
//! - [`waiter`] - bounded poll for offer readiness
//! - [`snapshot`] - top-offer read and validation
//! - [`scheduler`] - cartesian traversal and the per-combination cycle
//!
//! [`run`] ties them into the per-product [`ExtractionRun`](run::ExtractionRun).
//! Only the scheduler depends on the other components; they have no
//! dependencies on each other. Every component call takes the session as an
//! explicit parameter so tests can substitute a fake.

pub mod catalog;
pub mod run;
pub mod scheduler;
pub mod selection;
pub mod snapshot;
pub mod waiter;

pub use catalog::read_catalog;
pub use run::ExtractionRun;
pub use scheduler::{combinations, CombinationScheduler};
pub use selection::{ControlError, SelectionController};
pub use snapshot::{SnapshotExtractor, SnapshotOutcome};
pub use waiter::{StabilizationWaiter, WaitOutcome};

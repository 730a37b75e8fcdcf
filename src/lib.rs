//! Faceted Product-Variant Extraction Library
//!
//! Harvests priced product-variant data from pages whose selectable options
//! (storage, color, ...) are rendered dynamically: selecting an option
//! mutates visible state, including the price, and independent option
//! dimensions compose combinatorially.
//!
//! The core is a failure-prone state machine driving a mutable external
//! resource. References handed out by the source go stale after any
//! mutation, the delay between a selection and its visible effect is
//! unbounded, and one combination's extraction must never corrupt the
//! starting state of the next. The engine therefore:
//!
//! - captures the option catalog exactly once per run,
//! - enumerates the cartesian product of all dimensions in deterministic
//!   odometer order (last dimension fastest),
//! - re-resolves every option by stable identifier immediately before use,
//!   retrying staleness within a fixed bound,
//! - waits for the offer state to settle with a bounded poll, never an
//!   indefinite block,
//! - clears *every* active selection between combinations, and
//! - isolates failures to the combination they occur in, preserving partial
//!   results when the run must abort.
//!
//! # Usage
//!
//! ```rust,ignore
//! use variant_extraction::{ExtractionRun, RunConfig};
//! use variant_extraction::testing::MockSession;
//!
//! let session = MockSession::new(); // any ContentSession
//! let config = RunConfig::new().with_dimensions(["storage", "color"]);
//!
//! let report = ExtractionRun::new(&session, config).execute().await;
//! for (combination, snapshot) in report.snapshots() {
//!     println!("{}: {} {}", combination.describe(), snapshot.price, snapshot.currency);
//! }
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Collaborator seams (`ContentSession`, `Navigator`, `RecordSink`)
//! - [`types`] - Catalog, combination, offer, report, and config types
//! - [`engine`] - Catalog read, selection control, stabilization wait,
//!   snapshot extraction, and the combination scheduler
//! - [`retry`] - Bounded retry against the flaky session
//! - [`harvest`] - Multi-product orchestration around the per-product run
//! - [`testing`] - Mock collaborators for testing

pub mod engine;
pub mod error;
pub mod harvest;
pub mod retry;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{
    AbortReason, CombinationFailure, NavigationError, SessionError, SessionResult, SinkError,
};
pub use traits::{ContentSession, Navigator, RecordSink};
pub use types::{
    Catalog, Combination, CombinationOutcome, CombinationResult, Dimension, FacetOption,
    HarvestConfig, OfferSnapshot, RawOffer, RunConfig, RunStatus, TraversalReport, TraversalStats,
};

// Re-export the engine surface
pub use engine::{
    combinations, read_catalog, CombinationScheduler, ExtractionRun, SelectionController,
    SnapshotExtractor, SnapshotOutcome, StabilizationWaiter, WaitOutcome,
};

// Re-export retry primitives
pub use retry::{RetryError, RetryPolicy};

// Re-export the harvest loop
pub use harvest::{harvest, harvest_with_cancellation, HarvestError, HarvestSummary};

//! Data types for catalogs, combinations, offers, and traversal reports.

pub mod catalog;
pub mod combination;
pub mod config;
pub mod offer;
pub mod report;

pub use catalog::{Catalog, Dimension, FacetOption};
pub use combination::Combination;
pub use config::{HarvestConfig, RunConfig};
pub use offer::{OfferSnapshot, RawOffer};
pub use report::{
    CombinationOutcome, CombinationResult, RunStatus, TraversalReport, TraversalStats,
};

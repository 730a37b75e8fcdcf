//! Catalog types: dimensions and their selectable options.
//!
//! The catalog is captured exactly once per run. Option *identifiers* are the
//! durable keys; any handle the session hands out may be invalidated by the
//! next mutation, so nothing here ever stores one.

use serde::{Deserialize, Serialize};

/// One selectable value within a dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOption {
    /// Stable identifier, valid for re-resolution across the whole run.
    pub id: String,

    /// Human-readable label (e.g. "256 GB").
    pub label: String,
}

impl FacetOption {
    /// Create a new option.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// An independent axis of choice (e.g. "storage") with its options as
/// observed at catalog-read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    /// Stable dimension name.
    pub name: String,

    /// Ordered options. Never refreshed mid-run, so combination counts stay
    /// deterministic even if the source's option list shifts under
    /// interaction.
    pub options: Vec<FacetOption>,
}

impl Dimension {
    /// Create a new dimension.
    pub fn new(name: impl Into<String>, options: Vec<FacetOption>) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }
}

/// The full set of dimensions discovered for one product, in discovery order.
///
/// An empty catalog is a valid state: the product has a single implicit
/// variant and is extracted without any selection step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Dimensions in discovery order. Every dimension has at least one
    /// option; dimensions the source does not expose contribute no entry.
    pub dimensions: Vec<Dimension>,
}

impl Catalog {
    /// Create a catalog from discovered dimensions.
    pub fn new(dimensions: Vec<Dimension>) -> Self {
        Self { dimensions }
    }

    /// Create an empty catalog (no selectable facets).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of combinations a full traversal will attempt:
    /// the product of all option counts, or 1 for an empty catalog.
    pub fn combination_count(&self) -> usize {
        self.dimensions
            .iter()
            .map(|d| d.options.len())
            .product::<usize>()
            .max(1)
    }

    /// Whether the catalog has no selectable facets.
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dim(name: &str, n: usize) -> Dimension {
        Dimension::new(
            name,
            (0..n)
                .map(|i| FacetOption::new(format!("{name}-{i}"), format!("{name} {i}")))
                .collect(),
        )
    }

    #[test]
    fn test_empty_catalog_counts_one_combination() {
        assert_eq!(Catalog::empty().combination_count(), 1);
    }

    #[test]
    fn test_combination_count_is_product_of_option_counts() {
        let catalog = Catalog::new(vec![dim("storage", 3), dim("color", 4)]);
        assert_eq!(catalog.combination_count(), 12);

        let single = Catalog::new(vec![dim("storage", 5)]);
        assert_eq!(single.combination_count(), 5);
    }
}

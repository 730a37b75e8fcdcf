//! A combination: one assignment of exactly one option per dimension.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::catalog::FacetOption;

/// One element of the cartesian product of all dimensions' options.
///
/// Maps each dimension name to the option chosen for it, in dimension order.
/// A dimension absent from the catalog contributes no entry; the empty
/// combination is the single combination of a catalog with no facets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combination {
    selections: IndexMap<String, FacetOption>,
}

impl Combination {
    /// The empty combination (zero-dimension catalog).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a combination from (dimension, option) pairs in dimension order.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, FacetOption)>) -> Self {
        Self {
            selections: pairs.into_iter().collect(),
        }
    }

    /// The option chosen for a dimension, if that dimension participates.
    pub fn option_for(&self, dimension: &str) -> Option<&FacetOption> {
        self.selections.get(dimension)
    }

    /// Iterate (dimension, option) pairs in dimension order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FacetOption)> {
        self.selections.iter().map(|(d, o)| (d.as_str(), o))
    }

    /// Number of participating dimensions.
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    /// Whether this is the empty combination.
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Compact human-readable form for logs, e.g. `storage=256gb, color=blue`.
    pub fn describe(&self) -> String {
        if self.selections.is_empty() {
            return "(no facets)".to_string();
        }
        self.selections
            .iter()
            .map(|(d, o)| format!("{}={}", d, o.label))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_dimension_order() {
        let combo = Combination::from_pairs([
            ("storage".to_string(), FacetOption::new("s1", "128 GB")),
            ("color".to_string(), FacetOption::new("c1", "Black")),
        ]);

        let dims: Vec<_> = combo.iter().map(|(d, _)| d.to_string()).collect();
        assert_eq!(dims, vec!["storage", "color"]);
        assert_eq!(combo.option_for("color").unwrap().id, "c1");
    }

    #[test]
    fn test_describe_empty_combination() {
        assert_eq!(Combination::empty().describe(), "(no facets)");
        assert!(Combination::empty().is_empty());
    }

    #[test]
    fn test_describe_uses_labels() {
        let combo = Combination::from_pairs([(
            "storage".to_string(),
            FacetOption::new("s1", "128 GB"),
        )]);
        assert_eq!(combo.describe(), "storage=128 GB");
    }
}

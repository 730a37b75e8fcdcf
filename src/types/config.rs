//! Configuration for traversal runs and multi-product harvests.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for one product's traversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Dimension names to probe at catalog read, in probe order.
    ///
    /// The session surface exposes options per dimension name, not a
    /// dimension listing, so the caller supplies the names to probe.
    /// Dimensions the source does not expose are simply omitted from the
    /// catalog. Default: `["storage", "color"]`.
    #[serde(default)]
    pub dimensions: Vec<String>,

    /// Total selection attempts per option, including the first.
    ///
    /// Default: 3.
    pub max_select_attempts: u32,

    /// Delay between selection attempts, letting the source settle.
    ///
    /// Default: 250ms.
    pub retry_delay_ms: u64,

    /// Upper bound on waiting for the offer state to become readable
    /// after a mutation. A timeout skips extraction for the current
    /// combination; it is not an error.
    ///
    /// Default: 10s.
    pub stabilization_timeout_ms: u64,

    /// Minimum interval between readiness polls.
    ///
    /// Default: 200ms.
    pub poll_interval_ms: u64,

    /// Wait for stabilization after each dimension's selection, not only
    /// after the full set. Needed when one dimension's selection must settle
    /// before the next dimension's options are valid.
    ///
    /// Default: true.
    pub settle_between_dimensions: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dimensions: vec!["storage".to_string(), "color".to_string()],
            max_select_attempts: 3,
            retry_delay_ms: 250,
            stabilization_timeout_ms: 10_000,
            poll_interval_ms: 200,
            settle_between_dimensions: true,
        }
    }
}

impl RunConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dimension names to probe.
    pub fn with_dimensions(
        mut self,
        dimensions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.dimensions = dimensions.into_iter().map(|d| d.into()).collect();
        self
    }

    /// Set the selection attempt bound.
    pub fn with_max_select_attempts(mut self, attempts: u32) -> Self {
        self.max_select_attempts = attempts.max(1);
        self
    }

    /// Set the inter-attempt delay.
    pub fn with_retry_delay_ms(mut self, ms: u64) -> Self {
        self.retry_delay_ms = ms;
        self
    }

    /// Set the stabilization timeout.
    pub fn with_stabilization_timeout_ms(mut self, ms: u64) -> Self {
        self.stabilization_timeout_ms = ms;
        self
    }

    /// Set the readiness poll interval.
    pub fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Disable the intermediate settle between dimension selections.
    pub fn without_intermediate_settle(mut self) -> Self {
        self.settle_between_dimensions = false;
        self
    }

    /// Inter-attempt delay as a `Duration`.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Stabilization timeout as a `Duration`.
    pub fn stabilization_timeout(&self) -> Duration {
        Duration::from_millis(self.stabilization_timeout_ms)
    }

    /// Poll interval as a `Duration`.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Configuration for a multi-product harvest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Per-product traversal configuration.
    pub run: RunConfig,

    /// Stop after this many products (None = visit all).
    pub max_products: Option<usize>,
}

impl HarvestConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-product run config.
    pub fn with_run(mut self, run: RunConfig) -> Self {
        self.run = run;
        self
    }

    /// Limit the number of products visited.
    pub fn with_max_products(mut self, max: usize) -> Self {
        self.max_products = Some(max);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = RunConfig::default();
        assert_eq!(config.max_select_attempts, 3);
        assert_eq!(config.retry_delay_ms, 250);
        assert_eq!(config.stabilization_timeout_ms, 10_000);
        assert_eq!(config.poll_interval_ms, 200);
        assert!(config.settle_between_dimensions);
        assert_eq!(config.dimensions, vec!["storage", "color"]);
    }

    #[test]
    fn test_attempt_bound_is_at_least_one() {
        let config = RunConfig::new().with_max_select_attempts(0);
        assert_eq!(config.max_select_attempts, 1);
    }

    #[test]
    fn test_builder_chain() {
        let config = RunConfig::new()
            .with_dimensions(["size", "finish"])
            .with_stabilization_timeout_ms(2_000)
            .without_intermediate_settle();
        assert_eq!(config.dimensions, vec!["size", "finish"]);
        assert_eq!(config.stabilization_timeout(), Duration::from_secs(2));
        assert!(!config.settle_between_dimensions);
    }
}

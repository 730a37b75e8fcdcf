//! One-shot catalog read: which dimensions exist and what their options are.

use tracing::{debug, warn};

use crate::error::{AbortReason, SessionError};
use crate::traits::ContentSession;
use crate::types::{Catalog, Dimension};

/// Read the facet catalog from the session, exactly once per run.
///
/// Probes each configured dimension name in order. A dimension with no
/// options contributes no entry; a probe that errors is logged and treated
/// as absent. The read fails with `CatalogUnavailable` only when every
/// probe errored, i.e. the session could not be queried at all. An empty
/// probe list, or probes that all return empty, yields a valid empty
/// catalog.
pub async fn read_catalog<S: ContentSession>(
    session: &S,
    dimensions: &[String],
) -> Result<Catalog, AbortReason> {
    let mut discovered = Vec::new();
    let mut probes_failed = 0;
    let mut first_error: Option<SessionError> = None;

    for name in dimensions {
        match session.list_options(name).await {
            Ok(options) if options.is_empty() => {
                debug!("dimension {} not present on this product", name);
            }
            Ok(options) => {
                debug!("dimension {}: {} options", name, options.len());
                discovered.push(Dimension::new(name.clone(), options));
            }
            Err(e) if e.is_fatal() => {
                return Err(AbortReason::SessionLost(e.to_string()));
            }
            Err(e) => {
                warn!("failed to probe dimension {}: {}", name, e);
                probes_failed += 1;
                first_error.get_or_insert(e);
            }
        }
    }

    // Every probe errored: the page structure is not queryable at all.
    if !dimensions.is_empty() && probes_failed == dimensions.len() {
        let reason = first_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no dimension could be probed".to_string());
        return Err(AbortReason::CatalogUnavailable(reason));
    }

    Ok(Catalog::new(discovered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSession;
    use crate::types::FacetOption;

    fn dims(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn test_reads_configured_dimensions_in_order() {
        let session = MockSession::new()
            .with_dimension(
                "storage",
                vec![FacetOption::new("s1", "128 GB"), FacetOption::new("s2", "256 GB")],
            )
            .with_dimension("color", vec![FacetOption::new("c1", "Black")]);

        let catalog = read_catalog(&session, &dims(&["storage", "color"]))
            .await
            .unwrap();
        assert_eq!(catalog.dimensions.len(), 2);
        assert_eq!(catalog.dimensions[0].name, "storage");
        assert_eq!(catalog.dimensions[1].name, "color");
        assert_eq!(catalog.combination_count(), 2);
    }

    #[tokio::test]
    async fn test_absent_dimension_contributes_no_entry() {
        let session = MockSession::new()
            .with_dimension("color", vec![FacetOption::new("c1", "Black")]);

        let catalog = read_catalog(&session, &dims(&["storage", "color"]))
            .await
            .unwrap();
        assert_eq!(catalog.dimensions.len(), 1);
        assert_eq!(catalog.dimensions[0].name, "color");
    }

    #[tokio::test]
    async fn test_no_facets_is_a_valid_empty_catalog() {
        let session = MockSession::new();
        let catalog = read_catalog(&session, &dims(&["storage", "color"]))
            .await
            .unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.combination_count(), 1);
    }

    #[tokio::test]
    async fn test_all_probes_failing_is_catalog_unavailable() {
        let session = MockSession::new()
            .fail_listing("storage")
            .fail_listing("color");

        let err = read_catalog(&session, &dims(&["storage", "color"]))
            .await
            .unwrap_err();
        assert!(matches!(err, AbortReason::CatalogUnavailable(_)));
    }

    #[tokio::test]
    async fn test_partial_probe_failure_keeps_surviving_dimensions() {
        let session = MockSession::new()
            .with_dimension("color", vec![FacetOption::new("c1", "Black")])
            .fail_listing("storage");

        let catalog = read_catalog(&session, &dims(&["storage", "color"]))
            .await
            .unwrap();
        assert_eq!(catalog.dimensions.len(), 1);
    }

    #[tokio::test]
    async fn test_lost_session_aborts_the_read() {
        let session = MockSession::new()
            .with_dimension("color", vec![FacetOption::new("c1", "Black")])
            .lose_session();

        let err = read_catalog(&session, &dims(&["color"])).await.unwrap_err();
        assert!(matches!(err, AbortReason::SessionLost(_)));
    }
}

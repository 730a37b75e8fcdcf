//! The navigator: supplies product addresses and positions the session.

use async_trait::async_trait;
use url::Url;

use crate::error::NavigationResult;

/// Supplies the list of product addresses to visit and positions the
/// content session at each product before a traversal begins.
///
/// Listing and positioning are upstream of the extraction core; the harvest
/// loop only consumes this seam.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// The product addresses to visit, in visit order.
    async fn product_addresses(&self) -> NavigationResult<Vec<Url>>;

    /// Position the content session at a product page.
    ///
    /// On return the session's facets and offer reflect that product.
    async fn open_product(&self, address: &Url) -> NavigationResult<()>;
}

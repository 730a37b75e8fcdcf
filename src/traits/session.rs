//! The content session: the external, mutable rendering resource the
//! engine drives.
//!
//! The session is a single shared mutable resource. Any mutation may
//! invalidate references previously handed out, so the contract is built
//! around stable identifiers: callers re-resolve before every use and never
//! cache a handle across calls. The session is always passed as an explicit
//! parameter, never ambient state.

use async_trait::async_trait;

use crate::error::SessionResult;
use crate::types::{FacetOption, RawOffer};

/// Interface to the external rendering session for one product page.
///
/// Every method is a synchronous round trip from the engine's point of view;
/// errors communicate the session's state:
///
/// - `Stale` / `Transient`: the call may succeed if repeated after the
///   source settles.
/// - `NotFound`: the identifier no longer exists.
/// - `Lost`: the session is unusable; the run must abort.
#[async_trait]
pub trait ContentSession: Send + Sync {
    /// List the selectable options for a dimension, in display order.
    ///
    /// An empty list means the product does not expose this dimension.
    async fn list_options(&self, dimension: &str) -> SessionResult<Vec<FacetOption>>;

    /// Select the option with the given stable identifier.
    async fn select_option(&self, option_id: &str) -> SessionResult<()>;

    /// List the identifiers of every currently active selection, including
    /// ones this caller did not make.
    async fn active_selections(&self) -> SessionResult<Vec<String>>;

    /// Deselect one active option.
    async fn deselect_option(&self, option_id: &str) -> SessionResult<()>;

    /// Read the current top-ranked offer, or `None` if no offer is rendered.
    async fn read_top_offer(&self) -> SessionResult<Option<RawOffer>>;

    /// Whether the primary offer indicator is present and readable.
    ///
    /// Polled by the stabilization waiter after mutations.
    async fn offer_ready(&self) -> SessionResult<bool>;
}

//! Testing utilities including mock collaborators.
//!
//! These are useful for testing applications that use the traversal engine
//! without a real rendering session: the mock session holds scripted
//! dimensions and offers, and can inject staleness, absent offers, slow
//! readiness, and session loss.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, RwLock};
use url::Url;

use crate::error::{
    NavigationError, NavigationResult, SessionError, SessionResult, SinkError, SinkResult,
};
use crate::traits::{ContentSession, Navigator, RecordSink};
use crate::types::{FacetOption, RawOffer, TraversalReport};

/// Record of a call made to the mock session.
#[derive(Debug, Clone)]
pub enum MockSessionCall {
    ListOptions { dimension: String },
    Select { option_id: String },
    ActiveSelections,
    Deselect { option_id: String },
    ReadOffer,
    OfferReady,
}

/// A scriptable in-memory content session.
///
/// Offers are keyed by the *set* of active selection ids, with an optional
/// default for any unscripted state. Selecting an option within a dimension
/// replaces that dimension's previous selection, like a real facet widget.
#[derive(Default)]
pub struct MockSession {
    /// Scripted dimensions in insertion order.
    dimensions: Arc<RwLock<Vec<(String, Vec<FacetOption>)>>>,

    /// Currently active selection ids.
    active: Arc<RwLock<Vec<String>>>,

    /// Offers keyed by active-selection set; `None` scripts an absent offer.
    offers: Arc<RwLock<HashMap<BTreeSet<String>, Option<RawOffer>>>>,

    /// Fallback offer for unscripted selection states.
    default_offer: Arc<RwLock<Option<RawOffer>>>,

    /// Remaining stale failures to inject, per option id.
    stale_selects: Arc<RwLock<HashMap<String, u32>>>,

    /// Option ids whose deselect always fails transiently.
    failing_deselects: Arc<RwLock<HashSet<String>>>,

    /// Dimensions whose listing always fails transiently.
    failing_listings: Arc<RwLock<HashSet<String>>>,

    /// Readiness polls to answer "not ready" before reporting ready.
    not_ready_polls: AtomicU32,

    /// Never report the offer as ready.
    never_ready: AtomicBool,

    /// The session is gone; every call fails with `Lost`.
    lost: AtomicBool,

    /// Successful selects remaining before the session is lost.
    selects_until_loss: Arc<RwLock<Option<u32>>>,

    /// Call tracking for assertions.
    calls: Arc<RwLock<Vec<MockSessionCall>>>,
}

impl MockSession {
    /// Create a session with no facets and no offer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a dimension with its options.
    pub fn with_dimension(self, name: impl Into<String>, options: Vec<FacetOption>) -> Self {
        self.dimensions.write().unwrap().push((name.into(), options));
        self
    }

    /// Script the offer shown for a specific set of active selections.
    pub fn with_offer(
        self,
        selection_ids: impl IntoIterator<Item = impl Into<String>>,
        offer: RawOffer,
    ) -> Self {
        let key: BTreeSet<String> = selection_ids.into_iter().map(|s| s.into()).collect();
        self.offers.write().unwrap().insert(key, Some(offer));
        self
    }

    /// Script an absent offer for a specific set of active selections.
    pub fn with_absent_offer_when(
        self,
        selection_ids: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let key: BTreeSet<String> = selection_ids.into_iter().map(|s| s.into()).collect();
        self.offers.write().unwrap().insert(key, None);
        self
    }

    /// Script the offer shown for any unscripted selection state.
    pub fn with_default_offer(self, offer: RawOffer) -> Self {
        *self.default_offer.write().unwrap() = Some(offer);
        self
    }

    /// Start with an already-active selection the run did not make.
    pub fn with_preexisting_selection(self, option_id: impl Into<String>) -> Self {
        self.active.write().unwrap().push(option_id.into());
        self
    }

    /// Make the next `times` select attempts for an option fail as stale.
    pub fn fail_select(self, option_id: impl Into<String>, times: u32) -> Self {
        self.stale_selects
            .write()
            .unwrap()
            .insert(option_id.into(), times);
        self
    }

    /// Make every deselect of an option fail transiently.
    pub fn fail_deselect(self, option_id: impl Into<String>) -> Self {
        self.failing_deselects
            .write()
            .unwrap()
            .insert(option_id.into());
        self
    }

    /// Make every listing of a dimension fail transiently.
    pub fn fail_listing(self, dimension: impl Into<String>) -> Self {
        self.failing_listings
            .write()
            .unwrap()
            .insert(dimension.into());
        self
    }

    /// Answer "not ready" to the first `polls` readiness checks.
    pub fn with_ready_after(self, polls: u32) -> Self {
        self.not_ready_polls.store(polls, Ordering::SeqCst);
        self
    }

    /// Never report the offer as ready.
    pub fn with_never_ready(self) -> Self {
        self.never_ready.store(true, Ordering::SeqCst);
        self
    }

    /// Start in the lost state; every call fails fatally.
    pub fn lose_session(self) -> Self {
        self.lost.store(true, Ordering::SeqCst);
        self
    }

    /// Lose the session after `selects` successful selections.
    pub fn lose_session_after_selects(self, selects: u32) -> Self {
        *self.selects_until_loss.write().unwrap() = Some(selects);
        self
    }

    /// Ids of the currently active selections.
    pub fn active_ids(&self) -> Vec<String> {
        self.active.read().unwrap().clone()
    }

    /// How many select attempts were issued for an option.
    pub fn select_attempts(&self, option_id: &str) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, MockSessionCall::Select { option_id: id } if id == option_id))
            .count()
    }

    /// How many readiness polls were issued.
    pub fn ready_polls(&self) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, MockSessionCall::OfferReady))
            .count()
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockSessionCall> {
        self.calls.read().unwrap().clone()
    }

    fn record(&self, call: MockSessionCall) {
        self.calls.write().unwrap().push(call);
    }

    fn check_lost(&self) -> SessionResult<()> {
        if self.lost.load(Ordering::SeqCst) {
            Err(SessionError::Lost("mock session lost".to_string()))
        } else {
            Ok(())
        }
    }

    fn dimension_of(&self, option_id: &str) -> Option<String> {
        self.dimensions
            .read()
            .unwrap()
            .iter()
            .find(|(_, options)| options.iter().any(|o| o.id == option_id))
            .map(|(name, _)| name.clone())
    }
}

#[async_trait]
impl ContentSession for MockSession {
    async fn list_options(&self, dimension: &str) -> SessionResult<Vec<FacetOption>> {
        self.record(MockSessionCall::ListOptions {
            dimension: dimension.to_string(),
        });
        self.check_lost()?;

        if self.failing_listings.read().unwrap().contains(dimension) {
            return Err(SessionError::Transient(format!(
                "listing {dimension} unavailable"
            )));
        }

        Ok(self
            .dimensions
            .read()
            .unwrap()
            .iter()
            .find(|(name, _)| name == dimension)
            .map(|(_, options)| options.clone())
            .unwrap_or_default())
    }

    async fn select_option(&self, option_id: &str) -> SessionResult<()> {
        self.record(MockSessionCall::Select {
            option_id: option_id.to_string(),
        });
        self.check_lost()?;

        if let Some(remaining) = self.stale_selects.write().unwrap().get_mut(option_id) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(SessionError::Stale(format!("option {option_id}")));
            }
        }

        let Some(dimension) = self.dimension_of(option_id) else {
            return Err(SessionError::NotFound(format!("option {option_id}")));
        };

        // Selecting within a dimension replaces that dimension's previous
        // selection, like a real facet widget.
        let mut active = self.active.write().unwrap();
        active.retain(|id| self.dimension_of(id).as_deref() != Some(dimension.as_str()));
        active.push(option_id.to_string());
        drop(active);

        let mut until_loss = self.selects_until_loss.write().unwrap();
        if let Some(remaining) = until_loss.as_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                self.lost.store(true, Ordering::SeqCst);
            }
        }

        Ok(())
    }

    async fn active_selections(&self) -> SessionResult<Vec<String>> {
        self.record(MockSessionCall::ActiveSelections);
        self.check_lost()?;
        Ok(self.active.read().unwrap().clone())
    }

    async fn deselect_option(&self, option_id: &str) -> SessionResult<()> {
        self.record(MockSessionCall::Deselect {
            option_id: option_id.to_string(),
        });
        self.check_lost()?;

        if self.failing_deselects.read().unwrap().contains(option_id) {
            return Err(SessionError::Transient(format!(
                "deselect {option_id} failed"
            )));
        }

        self.active.write().unwrap().retain(|id| id != option_id);
        Ok(())
    }

    async fn read_top_offer(&self) -> SessionResult<Option<RawOffer>> {
        self.record(MockSessionCall::ReadOffer);
        self.check_lost()?;

        let key: BTreeSet<String> = self.active.read().unwrap().iter().cloned().collect();
        if let Some(scripted) = self.offers.read().unwrap().get(&key) {
            return Ok(scripted.clone());
        }
        Ok(self.default_offer.read().unwrap().clone())
    }

    async fn offer_ready(&self) -> SessionResult<bool> {
        self.record(MockSessionCall::OfferReady);
        self.check_lost()?;

        if self.never_ready.load(Ordering::SeqCst) {
            return Ok(false);
        }

        let remaining = self.not_ready_polls.load(Ordering::SeqCst);
        if remaining > 0 {
            self.not_ready_polls.store(remaining - 1, Ordering::SeqCst);
            return Ok(false);
        }
        Ok(true)
    }
}

/// A mock navigator with a fixed product list.
#[derive(Default)]
pub struct MockNavigator {
    products: Arc<RwLock<Vec<Url>>>,
    failing_opens: Arc<RwLock<HashSet<Url>>>,
    listing_fails: AtomicBool,
    opened: Arc<RwLock<Vec<Url>>>,
}

impl MockNavigator {
    /// Create a navigator with no products.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the product list.
    pub fn with_products(self, products: impl IntoIterator<Item = Url>) -> Self {
        self.products.write().unwrap().extend(products);
        self
    }

    /// Make opening a specific product fail.
    pub fn fail_open(self, product: Url) -> Self {
        self.failing_opens.write().unwrap().insert(product);
        self
    }

    /// Make the product listing fail.
    pub fn fail_listing(self) -> Self {
        self.listing_fails.store(true, Ordering::SeqCst);
        self
    }

    /// Products that were opened, in order.
    pub fn opened(&self) -> Vec<Url> {
        self.opened.read().unwrap().clone()
    }
}

#[async_trait]
impl Navigator for MockNavigator {
    async fn product_addresses(&self) -> NavigationResult<Vec<Url>> {
        if self.listing_fails.load(Ordering::SeqCst) {
            return Err(NavigationError::ListingUnavailable(
                "mock listing failure".to_string(),
            ));
        }
        Ok(self.products.read().unwrap().clone())
    }

    async fn open_product(&self, address: &Url) -> NavigationResult<()> {
        if self.failing_opens.read().unwrap().contains(address) {
            return Err(NavigationError::OpenFailed {
                url: address.to_string(),
                reason: "mock open failure".to_string(),
            });
        }
        self.opened.write().unwrap().push(address.clone());
        Ok(())
    }
}

/// A record sink that keeps every report it receives.
#[derive(Default)]
pub struct RecordingSink {
    records: Arc<RwLock<Vec<(Url, TraversalReport)>>>,
    failing: AtomicBool,
}

impl RecordingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every report.
    pub fn fail_all(self) -> Self {
        self.failing.store(true, Ordering::SeqCst);
        self
    }

    /// The recorded reports in arrival order.
    pub fn records(&self) -> Vec<(Url, TraversalReport)> {
        self.records.read().unwrap().clone()
    }
}

#[async_trait]
impl RecordSink for RecordingSink {
    async fn record(&self, product: &Url, report: &TraversalReport) -> SinkResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SinkError("mock sink failure".to_string()));
        }
        self.records
            .write()
            .unwrap()
            .push((product.clone(), report.clone()));
        Ok(())
    }
}

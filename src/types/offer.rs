//! Offer types: the raw session read and the validated snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The top-ranked offer as read from the session, before validation.
///
/// Every field is optional at this stage; the extractor decides whether the
/// read is complete enough to materialize a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOffer {
    /// Numeric-bearing price string (e.g. "1299.99").
    pub price: Option<String>,

    /// Currency code (e.g. "AZN").
    pub currency: Option<String>,

    /// Seller label.
    pub seller: Option<String>,

    /// Channel/source label (e.g. the listing website).
    pub channel: Option<String>,
}

impl RawOffer {
    /// Create a raw offer with just the required fields populated.
    pub fn new(price: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            price: Some(price.into()),
            currency: Some(currency.into()),
            seller: None,
            channel: None,
        }
    }

    /// Set the seller label.
    pub fn with_seller(mut self, seller: impl Into<String>) -> Self {
        self.seller = Some(seller.into());
        self
    }

    /// Set the channel label.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }
}

/// A validated offer snapshot for one combination.
///
/// Only materialized when price and currency are both present; seller and
/// channel are opportunistic and may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferSnapshot {
    /// Price as a numeric-bearing string, exactly as the source renders it.
    pub price: String,

    /// Currency code.
    pub currency: String,

    /// Seller label, if the source exposed one.
    pub seller: Option<String>,

    /// Channel/source label, if the source exposed one.
    pub channel: Option<String>,

    /// When the snapshot was captured.
    pub captured_at: DateTime<Utc>,
}

impl OfferSnapshot {
    /// Validate a raw offer into a snapshot.
    ///
    /// Returns `Err` with the names of the missing required fields if price
    /// or currency is absent (an absent offer is missing both).
    pub fn from_raw(raw: RawOffer) -> Result<Self, Vec<String>> {
        let mut missing = Vec::new();
        if raw.price.is_none() {
            missing.push("price".to_string());
        }
        if raw.currency.is_none() {
            missing.push("currency".to_string());
        }
        if !missing.is_empty() {
            return Err(missing);
        }

        Ok(Self {
            price: raw.price.unwrap_or_default(),
            currency: raw.currency.unwrap_or_default(),
            seller: raw.seller,
            channel: raw.channel,
            captured_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_requires_price_and_currency() {
        let complete = RawOffer::new("1299.99", "AZN").with_seller("Kontakt");
        let snapshot = OfferSnapshot::from_raw(complete).unwrap();
        assert_eq!(snapshot.price, "1299.99");
        assert_eq!(snapshot.currency, "AZN");
        assert_eq!(snapshot.seller.as_deref(), Some("Kontakt"));
        assert_eq!(snapshot.channel, None);
    }

    #[test]
    fn test_from_raw_reports_missing_fields() {
        let missing = OfferSnapshot::from_raw(RawOffer::default()).unwrap_err();
        assert_eq!(missing, vec!["price", "currency"]);

        let no_currency = RawOffer {
            price: Some("10".to_string()),
            ..Default::default()
        };
        assert_eq!(
            OfferSnapshot::from_raw(no_currency).unwrap_err(),
            vec!["currency"]
        );
    }
}

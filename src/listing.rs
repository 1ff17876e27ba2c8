//! Listing and evaluation result types.
//!
//! A [`Listing`] is validated once at construction and never changes
//! afterwards. An [`EvaluatedListing`] wraps it with a verdict, a clamped
//! confidence and a non-empty reason, whichever evaluator produced it.

use crate::error::ListingError;
use serde::{Deserialize, Serialize};
use std::fmt;

const DEFAULT_CURRENCY: &str = "EUR";
const UNKNOWN: &str = "unknown";

/// A single marketplace offer for a computer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ListingRecord")]
pub struct Listing {
    title: String,
    price: f64,
    currency: String,
    url: String,
    condition: String,
    location: String,
}

/// Wire shape accepted when reading listings from JSON.
#[derive(Debug, Deserialize)]
struct ListingRecord {
    title: String,
    price: f64,
    #[serde(default = "default_currency")]
    currency: String,
    #[serde(alias = "item_url")]
    url: String,
    #[serde(default = "unknown")]
    condition: String,
    #[serde(default = "unknown")]
    location: String,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn unknown() -> String {
    UNKNOWN.to_string()
}

impl TryFrom<ListingRecord> for Listing {
    type Error = ListingError;

    fn try_from(record: ListingRecord) -> Result<Self, Self::Error> {
        Ok(Listing::new(record.title, record.price, record.url)?
            .with_currency(record.currency)
            .with_condition(record.condition)
            .with_location(record.location))
    }
}

impl Listing {
    /// Create a listing with default currency, condition and location.
    ///
    /// Rejects negative and non-finite prices.
    pub fn new(
        title: impl Into<String>,
        price: f64,
        url: impl Into<String>,
    ) -> Result<Self, ListingError> {
        if !price.is_finite() {
            return Err(ListingError::NonFinitePrice);
        }
        if price < 0.0 {
            return Err(ListingError::NegativePrice(price));
        }
        // -0.0 would otherwise sort before 0.0 under total_cmp
        let price = if price == 0.0 { 0.0 } else { price };

        Ok(Self {
            title: title.into(),
            price,
            currency: default_currency(),
            url: url.into(),
            condition: unknown(),
            location: unknown(),
        })
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = condition.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

/// Suitability category assigned to a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Suitable,
    ConditionallySuitable,
    Unsuitable,
}

impl Verdict {
    pub const ALL: [Verdict; 3] = [
        Verdict::Suitable,
        Verdict::ConditionallySuitable,
        Verdict::Unsuitable,
    ];

    /// Map a clamped heuristic score onto a verdict (75 / 50 thresholds).
    pub fn from_score(score: u8) -> Self {
        match score {
            75.. => Verdict::Suitable,
            50..=74 => Verdict::ConditionallySuitable,
            _ => Verdict::Unsuitable,
        }
    }

    /// Parse a label as produced by a model. Trims and lower-cases first;
    /// anything outside the three categories yields `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "suitable" => Some(Verdict::Suitable),
            "conditionally_suitable" => Some(Verdict::ConditionallySuitable),
            "unsuitable" => Some(Verdict::Unsuitable),
            _ => None,
        }
    }

    /// Sort priority used by the `best` ranking (lower ranks first).
    pub fn priority(&self) -> u8 {
        match self {
            Verdict::Suitable => 0,
            Verdict::ConditionallySuitable => 1,
            Verdict::Unsuitable => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Suitable => "suitable",
            Verdict::ConditionallySuitable => "conditionally_suitable",
            Verdict::Unsuitable => "unsuitable",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default reason used when an evaluator provides none.
pub const NO_JUSTIFICATION: &str = "no justification provided";

/// A listing together with its verdict, confidence and justification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedListing {
    #[serde(flatten)]
    listing: Listing,
    verdict: Verdict,
    confidence: u8,
    reason: String,
}

impl EvaluatedListing {
    /// Build a result, clamping `confidence` into 0..=100 and substituting
    /// a default for a blank reason.
    pub fn new(
        listing: Listing,
        verdict: Verdict,
        confidence: i64,
        reason: impl Into<String>,
    ) -> Self {
        let reason = reason.into();
        let reason = if reason.trim().is_empty() {
            NO_JUSTIFICATION.to_string()
        } else {
            reason
        };

        Self {
            listing,
            verdict,
            confidence: confidence.clamp(0, 100) as u8,
            reason,
        }
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn confidence(&self) -> u8 {
        self.confidence
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn price(&self) -> f64 {
        self.listing.price
    }

    pub fn title(&self) -> &str {
        &self.listing.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_defaults() {
        let listing = Listing::new("HP 250 G7", 179.0, "https://www.ebay.de/").unwrap();
        assert_eq!(listing.currency(), "EUR");
        assert_eq!(listing.condition(), "unknown");
        assert_eq!(listing.location(), "unknown");
    }

    #[test]
    fn test_listing_rejects_bad_prices() {
        assert_eq!(
            Listing::new("x", -1.0, "#").unwrap_err(),
            ListingError::NegativePrice(-1.0)
        );
        assert_eq!(
            Listing::new("x", f64::NAN, "#").unwrap_err(),
            ListingError::NonFinitePrice
        );
        assert!(Listing::new("x", 0.0, "#").is_ok());

        let free = Listing::new("x", -0.0, "#").unwrap();
        assert!(free.price().is_sign_positive());
    }

    #[test]
    fn test_listing_from_json_applies_defaults_and_validation() {
        let listing: Listing =
            serde_json::from_str(r##"{"title": "Dell", "price": 99.5, "item_url": "#"}"##).unwrap();
        assert_eq!(listing.url(), "#");
        assert_eq!(listing.currency(), "EUR");
        assert_eq!(listing.condition(), "unknown");

        let negative =
            serde_json::from_str::<Listing>(r##"{"title": "Dell", "price": -5, "url": "#"}"##);
        assert!(negative.is_err());
    }

    #[test]
    fn test_verdict_labels() {
        assert_eq!(Verdict::from_label("  Suitable "), Some(Verdict::Suitable));
        assert_eq!(
            Verdict::from_label("CONDITIONALLY_SUITABLE"),
            Some(Verdict::ConditionallySuitable)
        );
        assert_eq!(Verdict::from_label("maybe"), None);
        for verdict in Verdict::ALL {
            assert_eq!(Verdict::from_label(verdict.as_str()), Some(verdict));
        }
    }

    #[test]
    fn test_verdict_thresholds() {
        assert_eq!(Verdict::from_score(100), Verdict::Suitable);
        assert_eq!(Verdict::from_score(75), Verdict::Suitable);
        assert_eq!(Verdict::from_score(74), Verdict::ConditionallySuitable);
        assert_eq!(Verdict::from_score(50), Verdict::ConditionallySuitable);
        assert_eq!(Verdict::from_score(49), Verdict::Unsuitable);
        assert_eq!(Verdict::from_score(0), Verdict::Unsuitable);
    }

    #[test]
    fn test_evaluated_listing_clamps_and_fills_reason() {
        let listing = Listing::new("x", 10.0, "#").unwrap();
        let high = EvaluatedListing::new(listing.clone(), Verdict::Suitable, 250, "great");
        assert_eq!(high.confidence(), 100);

        let low = EvaluatedListing::new(listing, Verdict::Unsuitable, -7, "   ");
        assert_eq!(low.confidence(), 0);
        assert_eq!(low.reason(), NO_JUSTIFICATION);
    }

    #[test]
    fn test_evaluated_listing_serializes_flat() {
        let listing = Listing::new("x", 10.0, "#").unwrap();
        let evaluated = EvaluatedListing::new(listing, Verdict::ConditionallySuitable, 60, "ok");
        let value = serde_json::to_value(&evaluated).unwrap();
        assert_eq!(value["title"], "x");
        assert_eq!(value["verdict"], "conditionally_suitable");
        assert_eq!(value["confidence"], 60);
    }
}

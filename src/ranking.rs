//! Ordering of evaluated listings.

use crate::listing::EvaluatedListing;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// How a ranked batch is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortStrategy {
    /// Verdict priority, then confidence descending, then price ascending.
    #[default]
    Best,
    /// Price ascending, then confidence descending.
    PriceAsc,
    /// Price descending, then confidence descending.
    PriceDesc,
}

impl SortStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortStrategy::Best => "best",
            SortStrategy::PriceAsc => "price_asc",
            SortStrategy::PriceDesc => "price_desc",
        }
    }

    /// Total order over two evaluated listings for this strategy.
    pub fn compare(&self, a: &EvaluatedListing, b: &EvaluatedListing) -> Ordering {
        let by_confidence_desc = b.confidence().cmp(&a.confidence());
        match self {
            SortStrategy::Best => a
                .verdict()
                .priority()
                .cmp(&b.verdict().priority())
                .then(by_confidence_desc)
                .then(a.price().total_cmp(&b.price())),
            SortStrategy::PriceAsc => a.price().total_cmp(&b.price()).then(by_confidence_desc),
            SortStrategy::PriceDesc => b.price().total_cmp(&a.price()).then(by_confidence_desc),
        }
    }
}

impl fmt::Display for SortStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "best" => Ok(SortStrategy::Best),
            "price_asc" => Ok(SortStrategy::PriceAsc),
            "price_desc" => Ok(SortStrategy::PriceDesc),
            other => Err(format!(
                "unknown sort '{}', expected best, price_asc or price_desc",
                other
            )),
        }
    }
}

/// Stable sort of a batch by the given strategy.
pub fn rank(mut evaluated: Vec<EvaluatedListing>, strategy: SortStrategy) -> Vec<EvaluatedListing> {
    evaluated.sort_by(|a, b| strategy.compare(a, b));
    evaluated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{Listing, Verdict};

    fn item(title: &str, verdict: Verdict, confidence: i64, price: f64) -> EvaluatedListing {
        let listing = Listing::new(title, price, "#").unwrap();
        EvaluatedListing::new(listing, verdict, confidence, "test")
    }

    fn titles(ranked: &[EvaluatedListing]) -> Vec<&str> {
        ranked.iter().map(|e| e.title()).collect()
    }

    fn sample() -> Vec<EvaluatedListing> {
        vec![
            item("A", Verdict::Suitable, 80, 150.0),
            item("B", Verdict::ConditionallySuitable, 90, 100.0),
            item("C", Verdict::Suitable, 60, 90.0),
        ]
    }

    #[test]
    fn test_best_orders_verdict_then_confidence() {
        let ranked = rank(sample(), SortStrategy::Best);
        assert_eq!(titles(&ranked), vec!["A", "C", "B"]);
    }

    #[test]
    fn test_best_breaks_ties_on_price() {
        let ranked = rank(
            vec![
                item("pricey", Verdict::Suitable, 80, 199.0),
                item("cheap", Verdict::Suitable, 80, 120.0),
                item("bad", Verdict::Unsuitable, 99, 10.0),
            ],
            SortStrategy::Best,
        );
        assert_eq!(titles(&ranked), vec!["cheap", "pricey", "bad"]);
    }

    #[test]
    fn test_price_strategies() {
        let ranked = rank(sample(), SortStrategy::PriceAsc);
        assert_eq!(titles(&ranked), vec!["C", "B", "A"]);

        let ranked = rank(sample(), SortStrategy::PriceDesc);
        assert_eq!(titles(&ranked), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_equal_price_uses_confidence() {
        let items = vec![
            item("low", Verdict::Suitable, 40, 100.0),
            item("high", Verdict::Unsuitable, 70, 100.0),
        ];
        assert_eq!(titles(&rank(items.clone(), SortStrategy::PriceAsc)), vec!["high", "low"]);
        assert_eq!(titles(&rank(items, SortStrategy::PriceDesc)), vec!["high", "low"]);
    }

    #[test]
    fn test_signed_zero_prices_tie() {
        let items = vec![
            item("plus", Verdict::Suitable, 50, 0.0),
            item("minus", Verdict::Suitable, 50, -0.0),
        ];
        for strategy in [SortStrategy::Best, SortStrategy::PriceAsc, SortStrategy::PriceDesc] {
            assert_eq!(titles(&rank(items.clone(), strategy)), vec!["plus", "minus"]);
        }
    }

    #[test]
    fn test_rank_is_idempotent() {
        for strategy in [SortStrategy::Best, SortStrategy::PriceAsc, SortStrategy::PriceDesc] {
            let once = rank(sample(), strategy);
            let twice = rank(once.clone(), strategy);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("price_desc".parse::<SortStrategy>().unwrap(), SortStrategy::PriceDesc);
        assert!("cheapest".parse::<SortStrategy>().is_err());
        assert_eq!(SortStrategy::default(), SortStrategy::Best);
    }
}

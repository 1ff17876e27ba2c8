//! Read-only result bundle handed to the presentation layer.

use crate::evaluator::{BatchOutcome, EvaluationMode, EvaluatorKind};
use crate::listing::{EvaluatedListing, Verdict};
use crate::ranking::{SortStrategy, rank};
use crate::source::Category;
use serde::Serialize;
use std::fmt::Write;

/// Number of listings per verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VerdictCounts {
    pub suitable: usize,
    pub conditionally_suitable: usize,
    pub unsuitable: usize,
}

impl VerdictCounts {
    pub fn tally<'a>(listings: impl IntoIterator<Item = &'a EvaluatedListing>) -> Self {
        let mut counts = Self::default();
        for listing in listings {
            match listing.verdict() {
                Verdict::Suitable => counts.suitable += 1,
                Verdict::ConditionallySuitable => counts.conditionally_suitable += 1,
                Verdict::Unsuitable => counts.unsuitable += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.suitable + self.conditionally_suitable + self.unsuitable
    }
}

/// Filters that shaped the batch.
#[derive(Debug, Clone, Serialize)]
pub struct AppliedFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<u32>,
    pub sort: SortStrategy,
}

/// Ranked listings plus counts and metadata.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    listings: Vec<EvaluatedListing>,
    counts: VerdictCounts,
    evaluator_mode: EvaluatorKind,
    requested_mode: EvaluationMode,
    filters: AppliedFilters,
    sample_data: bool,
}

impl EvaluationReport {
    /// Rank a batch outcome and summarize it.
    pub fn build(
        outcome: BatchOutcome,
        requested_mode: EvaluationMode,
        filters: AppliedFilters,
        sample_data: bool,
    ) -> Self {
        let listings = rank(outcome.listings, filters.sort);
        let counts = VerdictCounts::tally(&listings);

        Self {
            listings,
            counts,
            evaluator_mode: outcome.mode,
            requested_mode,
            filters,
            sample_data,
        }
    }

    pub fn listings(&self) -> &[EvaluatedListing] {
        &self.listings
    }

    pub fn counts(&self) -> VerdictCounts {
        self.counts
    }

    pub fn evaluator_mode(&self) -> EvaluatorKind {
        self.evaluator_mode
    }

    pub fn requested_mode(&self) -> EvaluationMode {
        self.requested_mode
    }

    pub fn filters(&self) -> &AppliedFilters {
        &self.filters
    }

    pub fn sample_data(&self) -> bool {
        self.sample_data
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Plain-text rendering for the terminal.
    pub fn format(&self) -> String {
        let mut out = String::new();

        let heading = self
            .filters
            .category
            .map(|c| c.label())
            .unwrap_or("Listings");
        let _ = write!(out, "{}", heading);
        if let Some(max_price) = self.filters.max_price {
            let _ = write!(out, " up to {} EUR", max_price);
        }
        let _ = writeln!(
            out,
            " | evaluator: {} (requested {}) | sort: {}",
            self.evaluator_mode, self.requested_mode, self.filters.sort
        );
        if self.sample_data {
            let _ = writeln!(out, "Using sample listings (no eBay token configured)");
        }
        let _ = writeln!(
            out,
            "suitable: {}  conditionally suitable: {}  unsuitable: {}",
            self.counts.suitable, self.counts.conditionally_suitable, self.counts.unsuitable
        );
        let _ = writeln!(out, "{}", "─".repeat(60));

        for (i, item) in self.listings.iter().enumerate() {
            let listing = item.listing();
            let _ = writeln!(
                out,
                "{:>2}. {} ({:.2} {})",
                i + 1,
                listing.title(),
                listing.price(),
                listing.currency()
            );
            let _ = writeln!(
                out,
                "    {} [{}%] {} | {} | {}",
                item.verdict(),
                item.confidence(),
                listing.condition(),
                listing.location(),
                listing.url()
            );
            let _ = writeln!(out, "    Reason: {}", item.reason());
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::Listing;

    fn outcome() -> BatchOutcome {
        let make = |title: &str, verdict, confidence, price| {
            let listing = Listing::new(title, price, "#").unwrap();
            EvaluatedListing::new(listing, verdict, confidence, "r")
        };
        BatchOutcome {
            listings: vec![
                make("B", Verdict::ConditionallySuitable, 90, 100.0),
                make("C", Verdict::Suitable, 60, 90.0),
                make("A", Verdict::Suitable, 80, 150.0),
                make("D", Verdict::Unsuitable, 20, 50.0),
            ],
            mode: EvaluatorKind::Heuristic,
        }
    }

    fn filters(sort: SortStrategy) -> AppliedFilters {
        AppliedFilters {
            category: Some(Category::Laptop),
            max_price: Some(200),
            sort,
        }
    }

    #[test]
    fn test_report_ranks_and_counts() {
        let report = EvaluationReport::build(
            outcome(),
            EvaluationMode::Auto,
            filters(SortStrategy::Best),
            true,
        );

        let titles: Vec<_> = report.listings().iter().map(|l| l.title()).collect();
        assert_eq!(titles, vec!["A", "C", "B", "D"]);
        assert_eq!(
            report.counts(),
            VerdictCounts {
                suitable: 2,
                conditionally_suitable: 1,
                unsuitable: 1
            }
        );
        assert_eq!(report.counts().total(), 4);
        assert_eq!(report.evaluator_mode(), EvaluatorKind::Heuristic);
        assert_eq!(report.requested_mode(), EvaluationMode::Auto);
    }

    #[test]
    fn test_report_json_shape() {
        let report = EvaluationReport::build(
            outcome(),
            EvaluationMode::Model,
            filters(SortStrategy::PriceAsc),
            false,
        );
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["evaluator_mode"], "heuristic");
        assert_eq!(value["requested_mode"], "model");
        assert_eq!(value["filters"]["sort"], "price_asc");
        assert_eq!(value["filters"]["category"], "laptop");
        assert_eq!(value["listings"][0]["title"], "D");
        assert_eq!(value["counts"]["suitable"], 2);
    }

    #[test]
    fn test_format_mentions_sample_data_and_reasons() {
        let report = EvaluationReport::build(
            outcome(),
            EvaluationMode::Heuristic,
            filters(SortStrategy::Best),
            true,
        );
        let text = report.format();
        assert!(text.starts_with("Laptops up to 200 EUR"));
        assert!(text.contains("sample listings"));
        assert!(text.contains(" 1. A (150.00 EUR)"));
        assert!(text.contains("Reason: r"));
    }
}

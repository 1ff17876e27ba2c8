//! Deterministic rule-based evaluation.
//!
//! Combines the component scores for one listing into a clamped confidence
//! and a verdict. No I/O and no failure modes; the same title always
//! produces the same result.

use crate::listing::{EvaluatedListing, Listing, Verdict};
use crate::scoring::{
    ScoreDelta, defect_penalty, graphics_score, memory_score, processor_score, ssd_bonus,
};

/// Starting score before any component contributes.
pub const BASE_SCORE: i32 = 15;

/// The individual contributions behind a heuristic score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub memory: ScoreDelta,
    pub processor: ScoreDelta,
    pub graphics: ScoreDelta,
    pub defect: Option<ScoreDelta>,
    pub ssd: Option<ScoreDelta>,
}

impl ScoreBreakdown {
    /// Score a title. The title is lower-cased here.
    pub fn for_title(title: &str) -> Self {
        let title = title.to_lowercase();
        Self {
            memory: memory_score(&title),
            processor: processor_score(&title),
            graphics: graphics_score(&title),
            defect: defect_penalty(&title),
            ssd: ssd_bonus(&title),
        }
    }

    /// Contributions in reason order: memory, processor, graphics, defect, SSD.
    pub fn deltas(&self) -> impl Iterator<Item = &ScoreDelta> {
        [&self.memory, &self.processor, &self.graphics]
            .into_iter()
            .chain(self.defect.as_ref())
            .chain(self.ssd.as_ref())
    }

    /// Sum of all contributions before clamping.
    pub fn raw_total(&self) -> i32 {
        BASE_SCORE + self.deltas().map(|d| d.points).sum::<i32>()
    }

    /// Total clamped into 0..=100.
    pub fn score(&self) -> u8 {
        self.raw_total().clamp(0, 100) as u8
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_score(self.score())
    }

    /// Notes joined in accumulation order.
    pub fn reason(&self) -> String {
        self.deltas()
            .map(|d| d.note.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Rule-based evaluator used when no model result is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEvaluator;

impl HeuristicEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate a single listing.
    pub fn evaluate(&self, listing: &Listing) -> EvaluatedListing {
        debug_assert!(listing.price() >= 0.0, "listing price validated at construction");

        let breakdown = ScoreBreakdown::for_title(listing.title());
        EvaluatedListing::new(
            listing.clone(),
            breakdown.verdict(),
            i64::from(breakdown.score()),
            breakdown.reason(),
        )
    }

    /// Evaluate every listing independently, preserving order.
    pub fn evaluate_all(&self, listings: &[Listing]) -> Vec<EvaluatedListing> {
        listings.iter().map(|listing| self.evaluate(listing)).collect()
    }

    pub fn breakdown(&self, title: &str) -> ScoreBreakdown {
        ScoreBreakdown::for_title(title)
    }
}

//! Prompt text for model-backed listing evaluation.

use crate::listing::Listing;
use serde::Serialize;

/// Minimum hardware a listing must reach to run the game.
#[derive(Debug, Clone, Serialize)]
pub struct Requirements {
    pub cpu: &'static str,
    pub ram: &'static str,
    pub gpu: &'static str,
}

/// Elden Ring minimum requirements.
pub const MIN_REQUIREMENTS: Requirements = Requirements {
    cpu: "Intel Core i5-8400 or AMD Ryzen 3 3300X",
    ram: "12 GB",
    gpu: "NVIDIA GTX 1060 3GB / AMD RX 580 4GB or better",
};

/// Collection of prompts used for listing evaluation.
pub struct Prompts;

impl Prompts {
    /// Instruction describing the task and the exact output contract.
    pub fn evaluate_listings() -> &'static str {
        r#"You are a hardware expert. Check every listing for whether it can run Elden Ring.
Take the minimum requirements into account and give a conservative, realistic assessment.
If important data is missing, rate cautiously.

Answer ONLY with a JSON array with exactly one object per listing, in the same order as the listings:
[
    {
        "verdict": "suitable" | "conditionally_suitable" | "unsuitable",
        "confidence": <integer 0-100>,
        "reason": <short justification>
    },
    ...
]
Directly return the JSON array. Do not output anything else."#
    }

    /// Full prompt for one batch: instruction, requirements and listings.
    pub fn batch_prompt(listings: &[Listing]) -> serde_json::Result<String> {
        Ok(format!(
            "{}\nMinimum requirements: {}\nListings: {}",
            Self::evaluate_listings(),
            serde_json::to_string(&MIN_REQUIREMENTS)?,
            serde_json::to_string(listings)?
        ))
    }
}

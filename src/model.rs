//! Model-backed batch evaluation.
//!
//! One prompt per batch, one JSON array back. The response must match the
//! batch positionally and in length; any deviation discards the whole batch
//! so the caller can fall back to the heuristic path. Out-of-range values
//! inside an otherwise valid response are clamped or coerced instead.

use crate::error::{CheckerError, Result};
use crate::listing::{EvaluatedListing, Listing, NO_JUSTIFICATION, Verdict};
use crate::llm::{InferenceBackend, Prompts};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_CONFIDENCE: i64 = 50;

/// One element of the model's answer array, before normalization.
#[derive(Debug, Deserialize)]
struct RawAssessment {
    #[serde(default)]
    verdict: Option<Value>,
    #[serde(default)]
    confidence: Option<Value>,
    #[serde(default)]
    reason: Option<Value>,
}

/// Evaluator that delegates scoring to an inference backend.
#[derive(Clone)]
pub struct ModelEvaluator {
    backend: Arc<dyn InferenceBackend>,
    timeout: Duration,
}

impl ModelEvaluator {
    pub fn new(backend: Arc<dyn InferenceBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub fn model(&self) -> &str {
        self.backend.model()
    }

    /// Evaluate the whole batch, or return `None` if anything goes wrong.
    pub async fn evaluate(&self, listings: &[Listing]) -> Option<Vec<EvaluatedListing>> {
        match self.try_evaluate(listings).await {
            Ok(results) => Some(results),
            Err(e) => {
                warn!(
                    model = %self.model(),
                    batch_size = listings.len(),
                    error = %e,
                    "Model evaluation failed, discarding batch"
                );
                None
            }
        }
    }

    /// Evaluate the batch, reporting why it failed.
    pub async fn try_evaluate(&self, listings: &[Listing]) -> Result<Vec<EvaluatedListing>> {
        let prompt = Prompts::batch_prompt(listings)?;

        let raw = tokio::time::timeout(self.timeout, self.backend.generate(&prompt))
            .await
            .map_err(|_| CheckerError::Timeout(self.timeout.as_secs()))??;

        debug!(response_len = raw.len(), "Received model response");
        parse_response(listings, &raw)
    }
}

/// Map a raw model payload onto the batch.
pub(crate) fn parse_response(listings: &[Listing], raw: &str) -> Result<Vec<EvaluatedListing>> {
    let json_str = extract_json(raw);

    let items: Vec<RawAssessment> = serde_json::from_str(json_str).map_err(|e| {
        CheckerError::MalformedResponse(format!(
            "expected a JSON array of assessments: {}. Response: {}",
            e,
            raw.chars().take(200).collect::<String>()
        ))
    })?;

    if items.len() != listings.len() {
        return Err(CheckerError::MalformedResponse(format!(
            "expected {} assessments, got {}",
            listings.len(),
            items.len()
        )));
    }

    listings
        .iter()
        .zip(items)
        .map(|(listing, item)| {
            let confidence = read_confidence(item.confidence.as_ref())?;
            Ok(EvaluatedListing::new(
                listing.clone(),
                read_verdict(item.verdict.as_ref()),
                confidence,
                read_reason(item.reason),
            ))
        })
        .collect()
}

fn read_confidence(value: Option<&Value>) -> Result<i64> {
    match value {
        None | Some(Value::Null) => Ok(DEFAULT_CONFIDENCE),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .ok_or_else(|| {
                CheckerError::MalformedResponse(format!("confidence {} out of range", n))
            }),
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| {
            CheckerError::MalformedResponse(format!("confidence '{}' is not a number", s))
        }),
        Some(other) => Err(CheckerError::MalformedResponse(format!(
            "confidence has unexpected type: {}",
            other
        ))),
    }
}

/// Unknown or missing verdicts become `Unsuitable`.
fn read_verdict(value: Option<&Value>) -> Verdict {
    value
        .and_then(Value::as_str)
        .and_then(Verdict::from_label)
        .unwrap_or(Verdict::Unsuitable)
}

fn read_reason(value: Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => NO_JUSTIFICATION.to_string(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    }
}

/// Strip a markdown fence around the array. Anything else is parsed as is.
fn extract_json(response: &str) -> &str {
    let response = response.trim();

    if let Some(rest) = response.strip_prefix("```json") {
        if let Some(end) = rest.rfind("```") {
            return rest[..end].trim();
        }
    }

    if let Some(rest) = response.strip_prefix("```") {
        if let Some(end) = rest.rfind("```") {
            return rest[..end].trim();
        }
    }

    response
}

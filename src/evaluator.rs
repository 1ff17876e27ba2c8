//! Batch evaluation with model-first, heuristic-fallback selection.
//!
//! The choice of evaluator is made once per batch: either every listing is
//! rated by the model, or every listing is rated by the heuristic. Results
//! are never mixed and the output always has one entry per input, in order.

use crate::config::InferenceConfig;
use crate::error::Result;
use crate::heuristic::HeuristicEvaluator;
use crate::listing::{EvaluatedListing, Listing};
use crate::llm::{InferenceBackend, OllamaClient};
use crate::model::ModelEvaluator;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Evaluator path requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationMode {
    /// Try the model, fall back silently.
    #[default]
    Auto,
    /// Always use the heuristic.
    Heuristic,
    /// Try the model, fall back silently. Same behavior as `Auto`.
    #[serde(alias = "ollama")]
    Model,
}

impl EvaluationMode {
    fn attempts_model(&self) -> bool {
        matches!(self, EvaluationMode::Auto | EvaluationMode::Model)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationMode::Auto => "auto",
            EvaluationMode::Heuristic => "heuristic",
            EvaluationMode::Model => "model",
        }
    }
}

impl fmt::Display for EvaluationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvaluationMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(EvaluationMode::Auto),
            "heuristic" => Ok(EvaluationMode::Heuristic),
            "model" | "ollama" => Ok(EvaluationMode::Model),
            other => Err(format!(
                "unknown evaluator '{}', expected auto, heuristic or model",
                other
            )),
        }
    }
}

/// Evaluator path that actually produced a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EvaluatorKind {
    #[serde(rename = "model-backed")]
    ModelBacked,
    #[serde(rename = "heuristic")]
    Heuristic,
}

impl EvaluatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluatorKind::ModelBacked => "model-backed",
            EvaluatorKind::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for EvaluatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Results of one batch together with the path that produced them.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub listings: Vec<EvaluatedListing>,
    pub mode: EvaluatorKind,
}

/// Chooses between model-backed and heuristic evaluation per batch.
///
/// Holds no per-batch state, so one instance can serve concurrent batches.
#[derive(Clone)]
pub struct Evaluator {
    model: Option<ModelEvaluator>,
    heuristic: HeuristicEvaluator,
}

impl Evaluator {
    /// Create an evaluator that can delegate to the given backend.
    pub fn new(backend: Arc<dyn InferenceBackend>, timeout: Duration) -> Self {
        Self {
            model: Some(ModelEvaluator::new(backend, timeout)),
            heuristic: HeuristicEvaluator::new(),
        }
    }

    /// Create an evaluator that only ever uses the heuristic.
    pub fn heuristic_only() -> Self {
        Self {
            model: None,
            heuristic: HeuristicEvaluator::new(),
        }
    }

    /// Build from configuration, using the Ollama client as backend.
    pub fn from_config(config: &InferenceConfig) -> Result<Self> {
        if !config.enabled {
            return Ok(Self::heuristic_only());
        }

        let client = OllamaClient::new(config.clone())?;
        Ok(Self::new(
            Arc::new(client),
            Duration::from_secs(config.timeout_secs),
        ))
    }

    /// Evaluate a batch. Never fails; returns one result per listing.
    ///
    /// Dropping the returned future while the model call is in flight
    /// cancels that call and no heuristic pass is started.
    pub async fn evaluate_batch(&self, listings: &[Listing], mode: EvaluationMode) -> BatchOutcome {
        if listings.is_empty() {
            return BatchOutcome {
                listings: Vec::new(),
                mode: EvaluatorKind::Heuristic,
            };
        }

        if mode.attempts_model() {
            if let Some(model) = &self.model {
                debug!(
                    batch_size = listings.len(),
                    model = %model.model(),
                    "Attempting model-backed evaluation"
                );
                if let Some(results) = model.evaluate(listings).await {
                    info!(batch_size = results.len(), "Batch evaluated by model");
                    return BatchOutcome {
                        listings: results,
                        mode: EvaluatorKind::ModelBacked,
                    };
                }
            }
        }

        info!(batch_size = listings.len(), requested = %mode, "Batch evaluated by heuristic");
        BatchOutcome {
            listings: self.heuristic.evaluate_all(listings),
            mode: EvaluatorKind::Heuristic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CheckerError;
    use crate::listing::Verdict;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Backend returning a fixed payload (or error) and counting calls.
    struct ScriptedBackend {
        reply: Option<String>,
        calls: AtomicUsize,
    }

    impl ScriptedBackend {
        fn ok(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl InferenceBackend for ScriptedBackend {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .clone()
                .ok_or_else(|| CheckerError::Http("connection refused".to_string()))
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    /// Backend whose request never completes; records when it is dropped.
    #[derive(Default)]
    struct HangingBackend {
        started: AtomicBool,
        dropped: Arc<AtomicBool>,
    }

    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl InferenceBackend for HangingBackend {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            let _flag = DropFlag(self.dropped.clone());
            self.started.store(true, Ordering::SeqCst);
            std::future::pending().await
        }

        fn model(&self) -> &str {
            "hanging"
        }
    }

    fn listings() -> Vec<Listing> {
        [
            ("Lenovo ThinkPad T480 i5-8250U 16GB RAM", 199.0),
            ("HP 250 G7 Intel i3-7020U 8GB RAM", 179.0),
            ("Dell Latitude 5590 i5-8350U 16GB RAM", 200.0),
        ]
        .into_iter()
        .map(|(title, price)| Listing::new(title, price, "https://www.ebay.de/").unwrap())
        .collect()
    }

    const MODEL_REPLY: &str = r#"[
        {"verdict": "conditionally_suitable", "confidence": 55, "reason": "no dedicated GPU"},
        {"verdict": "unsuitable", "confidence": 90, "reason": "i3 and 8GB"},
        {"verdict": "conditionally_suitable", "confidence": 50, "reason": "no dedicated GPU"}
    ]"#;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("AUTO".parse::<EvaluationMode>().unwrap(), EvaluationMode::Auto);
        assert_eq!("ollama".parse::<EvaluationMode>().unwrap(), EvaluationMode::Model);
        assert!("remote".parse::<EvaluationMode>().is_err());
    }

    #[tokio::test]
    async fn test_empty_batch_skips_model() {
        let backend = ScriptedBackend::ok("[]");
        let evaluator = Evaluator::new(backend.clone(), Duration::from_secs(5));

        let outcome = evaluator.evaluate_batch(&[], EvaluationMode::Model).await;
        assert!(outcome.listings.is_empty());
        assert_eq!(outcome.mode, EvaluatorKind::Heuristic);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_model_result_adopted() {
        let backend = ScriptedBackend::ok(MODEL_REPLY);
        let evaluator = Evaluator::new(backend.clone(), Duration::from_secs(5));

        let outcome = evaluator.evaluate_batch(&listings(), EvaluationMode::Auto).await;
        assert_eq!(outcome.mode, EvaluatorKind::ModelBacked);
        assert_eq!(outcome.listings.len(), 3);
        assert_eq!(outcome.listings[1].reason(), "i3 and 8GB");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_heuristic_mode_never_calls_model() {
        let backend = ScriptedBackend::ok(MODEL_REPLY);
        let evaluator = Evaluator::new(backend.clone(), Duration::from_secs(5));

        let outcome = evaluator
            .evaluate_batch(&listings(), EvaluationMode::Heuristic)
            .await;
        assert_eq!(outcome.mode, EvaluatorKind::Heuristic);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failures_fall_back_to_full_heuristic() {
        let items = listings();
        let expected = HeuristicEvaluator::new().evaluate_all(&items);

        let wrong_length = ScriptedBackend::ok(r#"[{"verdict": "suitable", "confidence": 99}]"#);
        let malformed = ScriptedBackend::ok("sure, here you go");
        let failing = ScriptedBackend::failing();

        for backend in [wrong_length, malformed, failing] {
            let evaluator = Evaluator::new(backend.clone(), Duration::from_secs(5));
            for mode in [EvaluationMode::Auto, EvaluationMode::Model] {
                let outcome = evaluator.evaluate_batch(&items, mode).await;
                assert_eq!(outcome.mode, EvaluatorKind::Heuristic);
                assert_eq!(outcome.listings, expected);
            }
            // one attempt per batch, no retries
            assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
        }
    }

    #[tokio::test]
    async fn test_heuristic_only_evaluator() {
        let outcome = Evaluator::heuristic_only()
            .evaluate_batch(&listings(), EvaluationMode::Model)
            .await;
        assert_eq!(outcome.mode, EvaluatorKind::Heuristic);
        assert_eq!(outcome.listings[0].verdict(), Verdict::ConditionallySuitable);
    }

    #[tokio::test]
    async fn test_every_result_within_bounds() {
        let evaluator = Evaluator::new(ScriptedBackend::ok(MODEL_REPLY), Duration::from_secs(5));
        for mode in [EvaluationMode::Auto, EvaluationMode::Heuristic, EvaluationMode::Model] {
            let outcome = evaluator.evaluate_batch(&listings(), mode).await;
            assert_eq!(outcome.listings.len(), 3);
            for result in &outcome.listings {
                assert!(result.confidence() <= 100);
                assert!(Verdict::ALL.contains(&result.verdict()));
                assert!(!result.reason().is_empty());
            }
        }
    }

    #[test]
    fn test_from_config_disabled_inference() {
        let config = InferenceConfig {
            enabled: false,
            ..Default::default()
        };
        let evaluator = Evaluator::from_config(&config).unwrap();
        assert!(evaluator.model.is_none());

        let outcome =
            tokio_test::block_on(evaluator.evaluate_batch(&listings(), EvaluationMode::Auto));
        assert_eq!(outcome.mode, EvaluatorKind::Heuristic);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_batch_cancels_model_call() {
        let backend = Arc::new(HangingBackend::default());
        let evaluator = Evaluator::new(backend.clone(), Duration::from_secs(3600));
        let items = listings();

        let outcome = tokio::select! {
            outcome = evaluator.evaluate_batch(&items, EvaluationMode::Auto) => Some(outcome),
            _ = tokio::time::sleep(Duration::from_secs(1)) => None,
        };

        assert!(outcome.is_none());
        assert!(backend.started.load(Ordering::SeqCst));
        assert!(backend.dropped.load(Ordering::SeqCst));
    }
}

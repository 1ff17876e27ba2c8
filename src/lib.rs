//! Rig Checker - rates second-hand computer listings for game suitability.
//!
//! Every listing in a batch gets a verdict (`suitable`,
//! `conditionally_suitable` or `unsuitable`), a confidence in 0..=100 and a
//! short justification. Evaluation is two-tiered:
//! 1. The whole batch is sent to a local LLM (any Ollama-compatible server)
//! 2. If that fails in any way, every listing is scored by a deterministic
//!    title heuristic instead
//!
//! Both paths produce the same [`EvaluatedListing`] type, so results can be
//! ranked and summarized uniformly.
//!
//! # Quick Start
//!
//! ```no_run
//! use rig_checker::{
//!     config::Config,
//!     evaluator::{EvaluationMode, Evaluator},
//!     ranking::SortStrategy,
//!     report::{AppliedFilters, EvaluationReport},
//!     source::{self, Category, ListingSource},
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     config.validate()?;
//!
//!     let source = source::from_config(&config.source)?;
//!     let listings = source.search(Category::Laptop, 200).await?;
//!
//!     let evaluator = Evaluator::from_config(&config.inference)?;
//!     let outcome = evaluator.evaluate_batch(&listings, EvaluationMode::Auto).await;
//!
//!     let filters = AppliedFilters {
//!         category: Some(Category::Laptop),
//!         max_price: Some(200),
//!         sort: SortStrategy::Best,
//!     };
//!     let sample = source.is_sample();
//!     let report = EvaluationReport::build(outcome, EvaluationMode::Auto, filters, sample);
//!     println!("{}", report.format());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **scoring**: memory / processor / graphics sub-scores from a title
//! - **HeuristicEvaluator**: combines sub-scores into a verdict
//! - **ModelEvaluator**: one LLM call per batch, strictly validated
//! - **Evaluator**: picks the path per batch and guarantees full coverage
//! - **ranking**: `best`, `price_asc` and `price_desc` orderings
//! - **EvaluationReport**: ranked listings, verdict counts and metadata

pub mod config;
pub mod error;
pub mod evaluator;
pub mod heuristic;
pub mod listing;
pub mod llm;
pub mod model;
pub mod ranking;
pub mod report;
pub mod scoring;
pub mod source;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{CheckerError, ListingError, Result};
pub use evaluator::{BatchOutcome, EvaluationMode, Evaluator, EvaluatorKind};
pub use heuristic::HeuristicEvaluator;
pub use listing::{EvaluatedListing, Listing, Verdict};
pub use llm::{InferenceBackend, OllamaClient};
pub use model::ModelEvaluator;
pub use ranking::{SortStrategy, rank};
pub use report::{AppliedFilters, EvaluationReport, VerdictCounts};
pub use source::{Category, ListingSource};

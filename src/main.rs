//! Rig Checker CLI
//!
//! Searches second-hand computer listings and rates them for game suitability.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rig_checker::{
    config::Config,
    evaluator::{BatchOutcome, EvaluationMode, Evaluator},
    heuristic::HeuristicEvaluator,
    listing::Listing,
    llm::OllamaClient,
    ranking::SortStrategy,
    report::{AppliedFilters, EvaluationReport},
    source::{self, Category, ListingSource},
    telemetry,
};
use std::future::Future;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Rig Checker - rates used computer listings for game suitability
#[derive(Parser)]
#[command(name = "rig-checker")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search listings and rate them
    Check {
        /// Kind of machine to search for (laptop or pc)
        #[arg(short, long, default_value = "laptop")]
        category: Category,

        /// Maximum price in EUR
        #[arg(
            short,
            long,
            default_value_t = 200,
            value_parser = clap::value_parser!(u32).range(50..=1000)
        )]
        max_price: u32,

        /// Evaluator to use (auto, heuristic or model)
        #[arg(short, long, default_value = "auto")]
        evaluator: EvaluationMode,

        /// Result ordering (best, price_asc or price_desc)
        #[arg(short, long, default_value = "best")]
        sort: SortStrategy,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rate listings read from a JSON file
    Evaluate {
        /// Path to a JSON array of listings
        listings: PathBuf,

        /// Evaluator to use (auto, heuristic or model)
        #[arg(short, long, default_value = "auto")]
        evaluator: EvaluationMode,

        /// Result ordering (best, price_asc or price_desc)
        #[arg(short, long, default_value = "best")]
        sort: SortStrategy,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the heuristic score breakdown for a listing title
    Explain {
        /// The listing title
        title: String,
    },

    /// Test connection to the inference endpoint
    Test,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().context("Failed to load configuration")?;
    telemetry::init(&config.telemetry).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Check {
            category,
            max_price,
            evaluator,
            sort,
            json,
        } => cmd_check(config, category, max_price, evaluator, sort, json).await,
        Commands::Evaluate {
            listings,
            evaluator,
            sort,
            json,
        } => cmd_evaluate(config, listings, evaluator, sort, json).await,
        Commands::Explain { title } => cmd_explain(&title),
        Commands::Test => cmd_test(config).await,
    }
}

/// Run a batch evaluation, abandoning it on Ctrl-C.
async fn evaluate_or_cancel(
    evaluation: impl Future<Output = BatchOutcome>,
) -> Result<Option<BatchOutcome>> {
    tokio::select! {
        outcome = evaluation => Ok(Some(outcome)),
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            info!("Evaluation cancelled");
            Ok(None)
        }
    }
}

fn print_report(report: &EvaluationReport, json: bool) -> Result<()> {
    if json {
        println!("{}", report.to_json().context("Failed to serialize report")?);
    } else {
        print!("{}", report.format());
    }
    Ok(())
}

async fn cmd_check(
    config: Config,
    category: Category,
    max_price: u32,
    mode: EvaluationMode,
    sort: SortStrategy,
    json: bool,
) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    let source = source::from_config(&config.source).context("Failed to create listing source")?;
    let listings = source
        .search(category, max_price)
        .await
        .context("Listing search failed")?;
    info!(count = listings.len(), %category, max_price, "Listings found");

    let evaluator =
        Evaluator::from_config(&config.inference).context("Failed to create evaluator")?;

    let start = Instant::now();
    let Some(outcome) = evaluate_or_cancel(evaluator.evaluate_batch(&listings, mode)).await? else {
        return Ok(());
    };
    info!(mode = %outcome.mode, elapsed = ?start.elapsed(), "Evaluation finished");

    let filters = AppliedFilters {
        category: Some(category),
        max_price: Some(max_price),
        sort,
    };
    let report = EvaluationReport::build(outcome, mode, filters, source.is_sample());
    print_report(&report, json)
}

async fn cmd_evaluate(
    config: Config,
    path: PathBuf,
    mode: EvaluationMode,
    sort: SortStrategy,
    json: bool,
) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read listings from '{}'", path.display()))?;
    let listings: Vec<Listing> =
        serde_json::from_str(&content).context("Failed to parse listings file")?;

    let evaluator =
        Evaluator::from_config(&config.inference).context("Failed to create evaluator")?;
    let Some(outcome) = evaluate_or_cancel(evaluator.evaluate_batch(&listings, mode)).await? else {
        return Ok(());
    };

    let filters = AppliedFilters {
        category: None,
        max_price: None,
        sort,
    };
    let report = EvaluationReport::build(outcome, mode, filters, false);
    print_report(&report, json)
}

fn cmd_explain(title: &str) -> Result<()> {
    let breakdown = HeuristicEvaluator::new().breakdown(title);

    println!("Title: {}", title);
    println!("{}", "─".repeat(40));
    println!("  {:>4}  base score", rig_checker::heuristic::BASE_SCORE);
    for delta in breakdown.deltas() {
        println!("  {:>+4}  {}", delta.points, delta.note);
    }
    println!("{}", "─".repeat(40));
    println!(
        "  Total: {} (clamped to {}) -> {}",
        breakdown.raw_total(),
        breakdown.score(),
        breakdown.verdict()
    );

    Ok(())
}

async fn cmd_test(config: Config) -> Result<()> {
    println!("Testing inference connection...\n");

    println!("Configuration:");
    println!("  API URL:   {}", config.inference.api_url);
    println!("  Model:     {}", config.inference.model);
    println!("  Timeout:   {}s", config.inference.timeout_secs);
    println!();

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Ok(());
    }

    let client = OllamaClient::new(config.inference).context("Failed to create client")?;

    println!("Sending test request...");
    match client.test_connection().await {
        Ok(()) => println!("Connection successful!"),
        Err(e) => println!("Connection failed: {}", e),
    }

    Ok(())
}

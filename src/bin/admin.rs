//! CLI administration tool for merch-reviews.
//!
//! Inspects how products are bucketed, what fallback reviews look like and
//! how the review API answers, without going through the HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # Show the review API group a product maps to
//! cargo run --bin admin -- group P1
//!
//! # Show the fallback reviews synthesized for a product
//! cargo run --bin admin -- mock P1
//!
//! # Fetch reviews through the circuit breaker (prompts for the id if omitted)
//! cargo run --bin admin -- fetch P1
//!
//! # Call the review API directly, surfacing errors instead of falling back
//! cargo run --bin admin -- fetch P1 --raw
//!
//! # Validate and print configuration
//! cargo run --bin admin -- config
//! ```
//!
//! # Environment Variables
//!
//! `fetch` and `config` read the same variables as the server
//! (see `merch_reviews::config`).

use merch_reviews::config::{self, Config, mask_secret};
use merch_reviews::domain::entities::{ProductId, ProductReviews};
use merch_reviews::domain::repositories::ReviewRepository;
use merch_reviews::infrastructure::resilience::{CircuitBreaker, CircuitState};
use merch_reviews::infrastructure::reviews::{
    ExternalReviewRepository, MockReviewGenerator, ReviewApiClient, ReviewSource,
};
use merch_reviews::server::REVIEW_BREAKER_NAME;
use merch_reviews::utils::bucketing::{product_group, stable_hash};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Input;
use std::sync::Arc;

/// CLI tool for inspecting merch-reviews.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the review API group for a product
    Group {
        /// Product identifier
        product_id: String,
    },

    /// Show the fallback reviews for a product
    Mock {
        /// Product identifier
        product_id: String,
    },

    /// Fetch reviews for a product from the review API
    Fetch {
        /// Product identifier (prompted for when omitted)
        product_id: Option<String>,

        /// Call the API directly without breaker or fallback
        #[arg(long)]
        raw: bool,
    },

    /// Validate and show configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Group { product_id } => show_group(&parse_id(&product_id)?),
        Commands::Mock { product_id } => show_mock(&parse_id(&product_id)?),
        Commands::Fetch { product_id, raw } => {
            let raw_id = match product_id {
                Some(id) => id,
                None => Input::new().with_prompt("Product id").interact_text()?,
            };
            let product_id = parse_id(&raw_id)?;
            let config = config::load_from_env()?;

            if raw {
                fetch_raw(&config, &product_id).await?;
            } else {
                fetch_guarded(&config, &product_id).await?;
            }
        }
        Commands::Config => show_config(&config::load_from_env()?),
    }

    Ok(())
}

fn parse_id(raw: &str) -> Result<ProductId> {
    ProductId::parse(raw).context("Invalid product id")
}

fn show_group(product_id: &ProductId) {
    println!("{}", "🔀 Product bucketing".bright_blue().bold());
    println!();
    println!("  Product: {}", product_id.as_str().cyan());
    println!(
        "  Hash:    {}",
        format!("{:016x}", stable_hash(product_id.as_str())).bright_black()
    );
    println!("  Group:   {}", product_group(product_id).bright_green().bold());
    println!();
}

fn show_mock(product_id: &ProductId) {
    println!("{}", "🎲 Fallback reviews".bright_blue().bold());
    println!();

    let reviews = MockReviewGenerator::new().generate(product_id);
    print_reviews(&reviews);
}

/// Runs one fetch exactly as the server does: through a fresh breaker, with
/// fallback on failure.
async fn fetch_guarded(config: &Config, product_id: &ProductId) -> Result<()> {
    println!("{}", "🔍 Fetching reviews (guarded)".bright_blue().bold());
    println!();

    let client = ReviewApiClient::new(&config.review_api_settings())?;
    let breaker = Arc::new(CircuitBreaker::new(
        REVIEW_BREAKER_NAME,
        config.circuit_breaker_config(),
    ));
    let repository = ExternalReviewRepository::new(Arc::new(client), breaker.clone());

    let reviews = repository.get_product_reviews(product_id, None).await;
    print_reviews(&reviews);

    let state = match breaker.state() {
        CircuitState::Closed => "closed".green(),
        CircuitState::HalfOpen => "half-open".yellow(),
        CircuitState::Open => "open".red(),
    };
    println!("  Breaker: {} ({} failure(s))", state, breaker.failure_count());
    println!();

    Ok(())
}

/// Calls the review API without breaker or fallback and prints what it parsed.
async fn fetch_raw(config: &Config, product_id: &ProductId) -> Result<()> {
    println!("{}", "🔍 Fetching reviews (raw)".bright_blue().bold());
    println!();

    let client = ReviewApiClient::new(&config.review_api_settings())?;
    println!("  URL: {}", client.request_url(product_id).as_str().bright_black());
    println!();

    match client.fetch_reviews(product_id).await {
        Ok(batch) => {
            println!("{}", "✅ Review API answered".green().bold());
            println!(
                "  Group:   {}",
                batch.group.as_deref().unwrap_or("-").cyan()
            );
            match batch.stats {
                Some(stats) => println!(
                    "  Stats:   {} average, {} total",
                    format!("{:.1}", stats.average_rating).bright_white().bold(),
                    stats.review_count
                ),
                None => println!("  Stats:   {}", "missing".red()),
            }
            match &batch.reviews {
                Some(reviews) => println!("  Reviews: {}", reviews.len()),
                None => println!("  Reviews: {}", "missing".red()),
            }
        }
        Err(e) => {
            println!("{}", "❌ Review API call failed".red().bold());
            println!("  Kind:  {}", e.kind().to_string().yellow());
            println!("  Error: {}", e);
        }
    }
    println!();

    Ok(())
}

fn show_config(config: &Config) {
    println!("{}", "⚙️  Configuration".bright_blue().bold());
    println!();
    println!("  Listen:          {}", config.listen_addr.cyan());
    println!("  Review API:      {}", config.review_api_base_url.cyan());
    println!(
        "  API key:         {} via {}{}",
        mask_secret(&config.review_api_key).bright_black(),
        config.review_api_key_header,
        if config.review_api_send_bearer { " + bearer" } else { "" }
    );
    println!("  Timeout:         {}s", config.review_api_timeout_seconds);
    println!(
        "  Breaker:         {} failures / {}s window, open {}s",
        config.breaker_failure_threshold,
        config.breaker_window_seconds,
        config.breaker_duration_seconds
    );
    let trip_on: Vec<String> = config.breaker_trip_on.iter().map(|k| k.to_string()).collect();
    println!("  Trips on:        {}", trip_on.join(", "));
    println!();
    println!("{}", "✅ Configuration is valid".green().bold());
}

/// Prints a review set in a table.
///
/// ```text
///   Average: 3.8 (4 reviews)
///
///   Rating  Date        Customer        Title
///   ─────────────────────────────────────────────────────────────────
///   ★★★★☆   2026-09-30  Jane Smith      Sample Review: 2 for Product
/// ```
fn print_reviews(result: &ProductReviews) {
    println!(
        "  Average: {} ({} reviews)",
        format!("{:.1}", result.stats.average_rating()).bright_white().bold(),
        result.stats.review_count()
    );
    println!();

    if result.reviews.is_empty() {
        println!("{}", "  No reviews".yellow());
        println!();
        return;
    }

    println!(
        "  {:<7} {:<11} {:<15} {}",
        "Rating".bright_white().bold(),
        "Date".bright_white().bold(),
        "Customer".bright_white().bold(),
        "Title".bright_white().bold()
    );
    println!("  {}", "─".repeat(65).bright_black());

    for review in &result.reviews {
        let filled = usize::from(review.rating());
        let stars = format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled));
        println!(
            "  {:<7} {:<11} {:<15} {}",
            stars.yellow(),
            review.created_at().format("%Y-%m-%d").to_string().bright_black(),
            review.customer_name().cyan(),
            review.title()
        );
    }
    println!();
}

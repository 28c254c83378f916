//! End-to-end research run against a live generation service.
//!
//! Requires `OPENAI_API_KEY`:
//!
//! ```sh
//! cargo run --example research_run --features openai -- "yoga mat" fitness
//! ```

use std::sync::Arc;

use keyword_research::ai::OpenAiGenerator;
use keyword_research::{FnReporter, HttpPageFetcher, Pipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keyword_research=debug".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().unwrap_or_else(|| "yoga mat".to_string());
    let niche = args.next();

    let pipeline = Pipeline::new(OpenAiGenerator::from_env()?, HttpPageFetcher::new())
        .with_progress(Arc::new(FnReporter(|status: &str, percent| {
            eprintln!("[{:>3}%] {}", percent, status);
        })));

    let candidates = pipeline
        .generate_keyword_opportunities_from_keyword(&seed, niche.as_deref())
        .await?;

    println!("\nTop opportunities for \"{}\":", seed);
    for candidate in candidates.iter().take(15) {
        println!(
            "  {:>3}  {}  (volume {}, difficulty {}, {:?})",
            candidate.potential_score,
            candidate.keyword,
            candidate.search_volume,
            candidate.difficulty,
            candidate.intent,
        );
    }

    let classified = pipeline
        .strategically_analyze_keywords(candidates, &seed)
        .await?;

    println!("\nStrategic tiers:");
    for candidate in classified.iter().take(15) {
        println!(
            "  {:?}  {}  [{}]",
            candidate.keyword_tier.unwrap(),
            candidate.keyword,
            candidate.cluster.as_deref().unwrap_or("-"),
        );
    }

    Ok(())
}

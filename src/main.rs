//! # Guardian Harvest
//!
//! A small harvester for Guardian article metadata. Each run pages through
//! the Content API search endpoint, appends the raw results to a CSV, and
//! rewrites a monthly aggregate of article counts per editorial pillar.
//! A daily API-call budget is tracked in a tiny state file so repeated runs
//! never exceed the configured number of requests per day.
//!
//! ## Usage
//!
//! ```sh
//! GUARDIAN_API_KEY=... guardian_harvest --query "elections OR Brexit"
//! ```
//!
//! ## Architecture
//!
//! One pass through a sequential pipeline:
//! 1. **Configure**: resolve defaults, optional YAML file, and CLI flags
//!    into a single [`config::Config`]
//! 2. **Fetch loop**: quota-gated pagination, one API call per page, each
//!    page persisted and the quota saved before the next call
//! 3. **Aggregate**: recompute the per-month per-pillar counts from this
//!    run's records and rewrite the aggregate CSV

use clap::Parser;
use std::error::Error;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod models;
mod outputs;
mod pipeline;
mod quota;

use api::GuardianFetcher;
use cli::Cli;
use config::Config;
use quota::QuotaStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("guardian_harvest starting up");

    // Parse CLI and resolve configuration
    let args = Cli::parse();
    debug!(?args.config, ?args.query, "Parsed CLI arguments");

    let config = Config::resolve(&args)?;
    info!(
        api_url = %config.api_url,
        query = %config.query,
        page_size = config.page_size,
        calls_per_day = config.calls_per_day,
        articles_file = %config.articles_file.display(),
        "Configuration resolved"
    );

    // ---- Fetch, persist, aggregate ----
    let fetcher = GuardianFetcher::new(&config);
    let quota = QuotaStore::new(&config.state_file, config.calls_per_day);

    let summary = pipeline::run(&config, &fetcher, &quota).await?;

    let elapsed = start_time.elapsed();
    info!(
        pages = summary.pages_fetched,
        articles = summary.articles_fetched,
        aggregated_pairs = summary.aggregated_pairs,
        ?elapsed,
        secs = elapsed.as_secs(),
        "Execution complete"
    );

    Ok(())
}

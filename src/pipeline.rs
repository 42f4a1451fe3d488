//! The rate-limited pagination loop.
//!
//! This is the orchestrating core: check the quota, fetch a page, persist
//! it, decrement and save the quota, pause, repeat. The loop stops when the
//! daily budget is exhausted or the fetcher returns an empty or failed
//! page — the two are deliberately indistinguishable to the loop — and then
//! writes the monthly aggregate over everything collected this run.
//!
//! Progress is durable per iteration: articles land in the CSV and the
//! quota file is updated before the next page is requested, so an
//! interrupted run loses at most the final aggregate. There is no
//! atomicity between the article append and the quota save; a crash
//! between the two can re-count an already-persisted page against a later
//! run's quota.

use crate::api::FetchPage;
use crate::config::Config;
use crate::outputs::{aggregate, table};
use crate::quota::QuotaStore;
use chrono::NaiveDateTime;
use std::error::Error;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

/// Pillar label used when the API omits one.
const UNKNOWN_PILLAR: &str = "Unknown";

/// What a completed run did, for the completion log line.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Pages fetched and persisted.
    pub pages_fetched: u32,
    /// Total records appended to the article CSV.
    pub articles_fetched: usize,
    /// (date, pillar) pairs that made it into the aggregate.
    pub aggregated_pairs: usize,
}

/// Run the fetch loop to completion, then write the monthly aggregate.
///
/// Pagination starts at page 1 and advances until the quota store reports
/// no remaining calls or the fetcher returns an empty or failed page. A
/// fetch failure is logged and treated as end-of-data, never retried and
/// never propagated. Filesystem errors writing the CSVs or the quota state
/// do propagate; those are real faults, not stop conditions.
///
/// The aggregate reflects only this run's records. Records whose
/// publication date is missing or unparsable are persisted to the article
/// CSV but skipped for aggregation, with a warning.
#[instrument(level = "info", skip_all)]
pub async fn run<F: FetchPage>(
    config: &Config,
    fetcher: &F,
    quota: &QuotaStore,
) -> Result<RunSummary, Box<dyn Error>> {
    let mut summary = RunSummary::default();
    let mut pairs: Vec<(NaiveDateTime, String)> = Vec::new();
    let mut page: u32 = 1;

    loop {
        let remaining = quota.load()?;
        if remaining <= 0 {
            info!("Daily API call limit reached; try again tomorrow");
            break;
        }

        let records = match fetcher.fetch(page).await {
            Ok(records) => records,
            Err(e) => {
                warn!(page, error = %e, "Fetch failed; treating as end of results");
                break;
            }
        };
        if records.is_empty() {
            info!(page, "No new articles");
            break;
        }

        for record in &records {
            match record.publication_date() {
                Some(date) => {
                    let pillar = record.pillar().unwrap_or_else(|| UNKNOWN_PILLAR.to_string());
                    pairs.push((date, pillar));
                }
                None => warn!(
                    id = record.field("id").as_deref().unwrap_or("<no id>"),
                    "Missing or unparsable publication date; excluding record from aggregation"
                ),
            }
        }

        table::append_records(&records, &config.articles_file, &config.fields)?;
        summary.pages_fetched += 1;
        summary.articles_fetched += records.len();

        page += 1;
        quota.save(remaining - 1)?;
        sleep(config.call_delay).await;
    }

    aggregate::write_monthly_counts(&pairs, &config.aggregate_file)?;
    summary.aggregated_pairs = pairs.len();
    Ok(summary)
}

//! Monthly aggregate output: article counts per pillar per month.
//!
//! The aggregate is derived data. It is recomputed in full from the
//! (date, pillar) pairs collected during the current run and the output
//! file is rewritten from scratch, header included, every time. Rows are
//! sorted by month and then category so repeated runs over the same input
//! produce byte-identical files.

use crate::outputs::format_row;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

/// Header of the aggregate CSV.
const HEADER: [&str; 3] = ["Month", "Category", "ArticleCount"];

/// Group `pairs` by (`YYYY-MM`, category), count each group, and rewrite
/// the CSV at `path` with one row per non-empty group.
///
/// An empty input still produces the file with just the header.
#[instrument(level = "info", skip(pairs), fields(path = %path.display(), pairs = pairs.len()))]
pub fn write_monthly_counts(
    pairs: &[(NaiveDateTime, String)],
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let mut counts: BTreeMap<(String, String), u64> = BTreeMap::new();
    for (date, category) in pairs {
        let month = date.format("%Y-%m").to_string();
        *counts.entry((month, category.clone())).or_insert(0) += 1;
    }

    let mut out = format_row(HEADER.map(String::from));
    for ((month, category), count) in &counts {
        out.push_str(&format_row([
            month.clone(),
            category.clone(),
            count.to_string(),
        ]));
    }

    fs::write(path, out)?;
    info!(groups = counts.len(), "Wrote monthly aggregate");
    Ok(())
}

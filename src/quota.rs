//! Durable tracking of the daily API-call budget.
//!
//! The remaining number of calls survives process restarts in a tiny state
//! file with two lines: the time of the last save and the remaining count.
//!
//! ```text
//! 2024-02-11 08:15:42.123456
//! 487
//! ```
//!
//! The count resets to the configured daily maximum the first time the
//! store is read on a new calendar day. A missing or malformed state file
//! is treated as "no prior state" and also yields the full daily budget;
//! the quota file is bookkeeping, not data worth failing a run over.

use chrono::{Local, NaiveDateTime};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Format used when writing the `last_access` line.
const TIMESTAMP_WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Format used when reading it back; the fractional part is optional so
/// hand-edited files without microseconds still parse.
const TIMESTAMP_READ_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Persistent counter of remaining daily API calls.
///
/// Single-slot, single-writer: every [`save`](Self::save) overwrites the
/// file, and the process assumes nothing else touches it. No locking.
#[derive(Debug)]
pub struct QuotaStore {
    path: PathBuf,
    calls_per_day: i64,
}

impl QuotaStore {
    /// Create a store over `path` with the given daily maximum.
    pub fn new(path: impl Into<PathBuf>, calls_per_day: i64) -> Self {
        Self {
            path: path.into(),
            calls_per_day,
        }
    }

    /// The state file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the remaining calls for today.
    ///
    /// Returns the configured daily maximum when no state file exists, when
    /// its contents do not parse, or when the recorded `last_access` date is
    /// strictly before today (day rollover). Otherwise returns the stored
    /// count unchanged.
    ///
    /// # Errors
    ///
    /// Only I/O failures reading an existing file are surfaced; malformed
    /// contents fall back quietly.
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<i64, Box<dyn Error>> {
        if !self.path.exists() {
            debug!("No quota state file; starting with the full daily budget");
            return Ok(self.calls_per_day);
        }
        let raw = fs::read_to_string(&self.path)?;
        let mut lines = raw.lines();

        let Some(last_access) = lines
            .next()
            .map(str::trim)
            .and_then(|s| NaiveDateTime::parse_from_str(s, TIMESTAMP_READ_FORMAT).ok())
        else {
            debug!("Quota state timestamp missing or malformed; treating as no prior state");
            return Ok(self.calls_per_day);
        };

        let Some(remaining) = lines.next().and_then(|s| s.trim().parse::<i64>().ok()) else {
            debug!("Quota state count missing or malformed; treating as no prior state");
            return Ok(self.calls_per_day);
        };

        if last_access.date() < Local::now().date_naive() {
            debug!(stale = %last_access, "Quota last touched on an earlier day; resetting");
            Ok(self.calls_per_day)
        } else {
            Ok(remaining)
        }
    }

    /// Overwrite the state file with the current time and `remaining_calls`.
    ///
    /// Negative counts are clamped to zero so a negative value is never
    /// persisted.
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn save(&self, remaining_calls: i64) -> Result<(), Box<dyn Error>> {
        let now = Local::now().naive_local();
        let contents = format!(
            "{}\n{}\n",
            now.format(TIMESTAMP_WRITE_FORMAT),
            remaining_calls.max(0)
        );
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

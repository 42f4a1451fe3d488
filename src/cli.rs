//! Command-line interface definitions for Guardian Harvest.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option is optional on the command line: anything left unset falls
//! back to the YAML config file (if given) and then to built-in defaults —
//! see [`crate::config::Config::resolve`]. The API key may also be supplied
//! via the `GUARDIAN_API_KEY` environment variable.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the Guardian Harvest application.
///
/// # Examples
///
/// ```sh
/// # API key from the environment, everything else defaulted
/// GUARDIAN_API_KEY=... guardian_harvest
///
/// # Explicit key and query
/// guardian_harvest --api-key YOUR_KEY --query "elections OR Brexit"
///
/// # Settings from a YAML file
/// guardian_harvest --config harvest.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Guardian Content API key
    #[arg(long, env = "GUARDIAN_API_KEY")]
    pub api_key: Option<String>,

    /// Free-text search query
    #[arg(short, long)]
    pub query: Option<String>,

    /// Path of the append-only article CSV
    #[arg(long)]
    pub articles_file: Option<PathBuf>,

    /// Path of the monthly aggregate CSV (rewritten every run)
    #[arg(long)]
    pub aggregate_file: Option<PathBuf>,

    /// Path of the daily quota state file
    #[arg(long)]
    pub state_file: Option<PathBuf>,

    /// Maximum API calls per calendar day
    #[arg(long)]
    pub calls_per_day: Option<i64>,

    /// Results requested per page
    #[arg(long)]
    pub page_size: Option<u32>,
}

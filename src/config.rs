//! Runtime configuration for the harvester.
//!
//! A [`Config`] is built exactly once at process start and handed by
//! reference to each component's constructor; nothing reads ambient global
//! state. Resolution order, lowest to highest precedence:
//!
//! 1. Built-in defaults (Guardian search endpoint, 500 calls/day, ...)
//! 2. An optional YAML config file (`--config harvest.yaml`)
//! 3. Command-line flags / environment overrides
//!
//! The API key is the only setting without a default; resolution fails with
//! a descriptive error when it is absent everywhere.

use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::cli::Cli;

const DEFAULT_API_URL: &str = "https://content.guardianapis.com/search";
const DEFAULT_QUERY: &str = "elections OR Brexit";
const DEFAULT_PAGE_SIZE: u32 = 50;
const DEFAULT_CALLS_PER_DAY: i64 = 500;
const DEFAULT_CALL_DELAY_MS: u64 = 1_000;

fn default_fields() -> Vec<String> {
    ["id", "webPublicationDate", "sectionName", "pillarName"]
        .map(String::from)
        .to_vec()
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Search endpoint URL.
    pub api_url: String,
    /// API key sent as the `api-key` query parameter.
    pub api_key: String,
    /// Free-text search query.
    pub query: String,
    /// Field whitelist: both the `show-fields` request parameter and the
    /// article CSV header, in order.
    pub fields: Vec<String>,
    /// Results requested per page.
    pub page_size: u32,
    /// Maximum API calls per calendar day.
    pub calls_per_day: i64,
    /// Courtesy pause between consecutive API calls.
    pub call_delay: Duration,
    /// Append-only article CSV.
    pub articles_file: PathBuf,
    /// Monthly aggregate CSV, rewritten every run.
    pub aggregate_file: PathBuf,
    /// Two-line quota state file.
    pub state_file: PathBuf,
}

/// Shape of the optional YAML config file. Every key is optional; unset
/// keys keep their defaults.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    api_url: Option<String>,
    api_key: Option<String>,
    query: Option<String>,
    fields: Option<Vec<String>>,
    page_size: Option<u32>,
    calls_per_day: Option<i64>,
    call_delay_ms: Option<u64>,
    articles_file: Option<PathBuf>,
    aggregate_file: Option<PathBuf>,
    state_file: Option<PathBuf>,
}

impl Config {
    /// Resolve the effective configuration from defaults, the optional YAML
    /// file named by `--config`, and CLI overrides.
    ///
    /// # Errors
    ///
    /// Fails when the config file cannot be read or parsed, or when no API
    /// key was provided by any source.
    pub fn resolve(cli: &Cli) -> Result<Self, Box<dyn Error>> {
        let file = match &cli.config {
            Some(path) => {
                let raw = fs::read_to_string(path)?;
                let parsed: ConfigFile = serde_yaml::from_str(&raw)?;
                info!(path = %path.display(), "Loaded config file");
                parsed
            }
            None => ConfigFile::default(),
        };

        let api_key = cli
            .api_key
            .clone()
            .or(file.api_key)
            .ok_or("no API key: pass --api-key, set GUARDIAN_API_KEY, or add api_key to the config file")?;

        Ok(Config {
            api_url: file.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_key,
            query: cli
                .query
                .clone()
                .or(file.query)
                .unwrap_or_else(|| DEFAULT_QUERY.to_string()),
            fields: file.fields.unwrap_or_else(default_fields),
            page_size: cli.page_size.or(file.page_size).unwrap_or(DEFAULT_PAGE_SIZE),
            calls_per_day: cli
                .calls_per_day
                .or(file.calls_per_day)
                .unwrap_or(DEFAULT_CALLS_PER_DAY),
            call_delay: Duration::from_millis(file.call_delay_ms.unwrap_or(DEFAULT_CALL_DELAY_MS)),
            articles_file: cli
                .articles_file
                .clone()
                .or(file.articles_file)
                .unwrap_or_else(|| PathBuf::from("articles.csv")),
            aggregate_file: cli
                .aggregate_file
                .clone()
                .or(file.aggregate_file)
                .unwrap_or_else(|| PathBuf::from("monthly_counts.csv")),
            state_file: cli
                .state_file
                .clone()
                .or(file.state_file)
                .unwrap_or_else(|| PathBuf::from("fetch_state.txt")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["guardian_harvest"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    /// A `Cli` with nothing set, bypassing clap so a `GUARDIAN_API_KEY` in
    /// the test environment cannot leak in through the env fallback.
    fn bare_cli() -> Cli {
        Cli {
            config: None,
            api_key: None,
            query: None,
            articles_file: None,
            aggregate_file: None,
            state_file: None,
            calls_per_day: None,
            page_size: None,
        }
    }

    #[test]
    fn test_defaults_with_cli_key() {
        let config = Config::resolve(&cli(&["--api-key", "k"])).unwrap();

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.query, DEFAULT_QUERY);
        assert_eq!(config.page_size, 50);
        assert_eq!(config.calls_per_day, 500);
        assert_eq!(config.call_delay, Duration::from_millis(1_000));
        assert_eq!(config.fields[0], "id");
        assert_eq!(config.articles_file, PathBuf::from("articles.csv"));
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let err = Config::resolve(&bare_cli()).unwrap_err();
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harvest.yaml");
        fs::write(
            &path,
            concat!(
                "api_key: from-file\n",
                "query: climate\n",
                "page_size: 10\n",
                "call_delay_ms: 0\n",
                "fields: [id, webPublicationDate]\n",
            ),
        )
        .unwrap();

        let config = Config::resolve(&Cli {
            config: Some(path),
            ..bare_cli()
        })
        .unwrap();

        assert_eq!(config.api_key, "from-file");
        assert_eq!(config.query, "climate");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.call_delay, Duration::ZERO);
        assert_eq!(config.fields, vec!["id", "webPublicationDate"]);
        // untouched keys keep their defaults
        assert_eq!(config.calls_per_day, 500);
    }

    #[test]
    fn test_cli_wins_over_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harvest.yaml");
        fs::write(&path, "api_key: from-file\nquery: climate\n").unwrap();

        let config = Config::resolve(&cli(&[
            "--config",
            path.to_str().unwrap(),
            "--api-key",
            "from-cli",
            "--query",
            "Brexit",
        ]))
        .unwrap();

        assert_eq!(config.api_key, "from-cli");
        assert_eq!(config.query, "Brexit");
    }

    #[test]
    fn test_unreadable_config_file_is_an_error() {
        assert!(Config::resolve(&cli(&["--config", "/does/not/exist.yaml"])).is_err());
    }
}

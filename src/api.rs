//! Paginated access to the article search API.
//!
//! This module wraps a single page-fetch against a Guardian-style content
//! search endpoint. The seam is trait-based:
//! - [`FetchPage`]: core trait for fetching one page of results
//! - [`GuardianFetcher`]: production implementation backed by `reqwest`
//!
//! The trait exists so the fetch loop can be driven by a stub in tests
//! without a network.
//!
//! # Failure model
//!
//! Any transport, HTTP-status, or decode failure comes back as `Err` with
//! the underlying reason. There is no retry here: the fetch loop treats a
//! failed page exactly like an empty one and stops paginating.

use crate::config::Config;
use crate::models::{ArticleRecord, SearchEnvelope};
use reqwest::Client;
use std::error::Error;
use tracing::{debug, info, instrument};

/// Trait for fetching one page of article search results.
pub trait FetchPage {
    /// Fetch the given 1-based page.
    ///
    /// Returns the page's result list verbatim; an empty list means the
    /// search ran out of results.
    async fn fetch(&self, page: u32) -> Result<Vec<ArticleRecord>, Box<dyn Error>>;
}

/// Production fetcher for the Guardian Content API.
///
/// Holds a reusable HTTP client plus the request parameters that stay fixed
/// across pages. Each call issues one GET with `api-key`, `q`,
/// `order-by=newest`, `show-fields`, `page-size`, and `page` query
/// parameters and decodes the `{response: {status, results}}` envelope.
#[derive(Debug)]
pub struct GuardianFetcher {
    client: Client,
    api_url: String,
    api_key: String,
    query: String,
    show_fields: String,
    page_size: u32,
}

impl GuardianFetcher {
    /// Build a fetcher from the resolved configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            query: config.query.clone(),
            show_fields: config.fields.join(","),
            page_size: config.page_size,
        }
    }
}

impl FetchPage for GuardianFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, page: u32) -> Result<Vec<ArticleRecord>, Box<dyn Error>> {
        let params = [
            ("api-key", self.api_key.clone()),
            ("q", self.query.clone()),
            ("order-by", "newest".to_string()),
            ("show-fields", self.show_fields.clone()),
            ("page-size", self.page_size.to_string()),
            ("page", page.to_string()),
        ];

        let response = self
            .client
            .get(&self.api_url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let envelope: SearchEnvelope = serde_json::from_str(&body)?;
        debug!(status = %envelope.response.status, "Decoded search envelope");

        let results = envelope.response.results;
        info!(page, count = results.len(), "Fetched article page");
        Ok(results)
    }
}

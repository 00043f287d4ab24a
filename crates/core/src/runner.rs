//! Concurrent extraction over a list of URLs.
//!
//! The main entry point is [`ExtractionRunner`], built from a [`RunConfig`].
//!
//! # Example
//!
//! ```rust,no_run
//! use sitesift_core::{ExtractionRunner, RunConfig};
//!
//! # async fn example() -> sitesift_core::Result<()> {
//! let config = RunConfig::builder().concurrency(8).timeout(15).build();
//! let runner = ExtractionRunner::new(config)?;
//!
//! let urls = vec!["https://example.com/a".to_string(), "https://example.com/b".to_string()];
//! let table = runner.run(&urls, "article h1").await?;
//! for row in table.iter() {
//!     println!("{}: {}", row.url, row.outcome);
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::Client;
use tokio::sync::Semaphore;
use tokio::task::JoinError;
use tracing::{debug, error, info};

use crate::Result;
use crate::extract::{ExtractionResult, Outcome, extract_with};
use crate::fetch::{DEFAULT_TIMEOUT_SECS, FetchConfig, build_client};
use crate::parse::ContentSelector;
use crate::sitemap::fetch_sitemap_urls;
use crate::table::ResultTable;

/// Default number of pages fetched at the same time.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Configuration for an extraction run.
///
/// # Example
///
/// ```rust
/// use sitesift_core::RunConfig;
///
/// let config = RunConfig::builder()
///     .concurrency(3)
///     .timeout(20)
///     .build();
/// assert_eq!(config.concurrency, 3);
/// assert_eq!(config.fetch.timeout, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Maximum number of in-flight page fetches (default: 5, minimum 1).
    pub concurrency: usize,

    /// HTTP settings shared by every request of the run.
    pub fetch: FetchConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { concurrency: DEFAULT_CONCURRENCY, fetch: FetchConfig::default() }
    }
}

impl RunConfig {
    /// Creates a new builder with default values.
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::new()
    }
}

/// Builder for RunConfig.
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: RunConfig::default() }
    }

    /// Sets the worker count. Zero is clamped to one.
    pub fn concurrency(mut self, value: usize) -> Self {
        self.config.concurrency = value.max(1);
        self
    }

    /// Sets the per-request timeout in seconds. Zero falls back to the default.
    pub fn timeout(mut self, secs: u64) -> Self {
        self.config.fetch.timeout = if secs == 0 { DEFAULT_TIMEOUT_SECS } else { secs };
        self
    }

    /// Sets the User-Agent header.
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.user_agent = value.into();
        self
    }

    /// Builds the config.
    pub fn build(self) -> RunConfig {
        self.config
    }
}

impl Default for RunConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs one selector over many pages with a bounded number of workers.
///
/// The runner owns the HTTP session for its lifetime; every request it makes,
/// sitemap included, goes through that one client.
#[derive(Debug, Clone)]
pub struct ExtractionRunner {
    client: Client,
    config: RunConfig,
}

impl ExtractionRunner {
    /// Creates a runner with a freshly built client.
    pub fn new(config: RunConfig) -> Result<Self> {
        let client = build_client(&config.fetch)?;
        Ok(Self::with_client(client, config))
    }

    /// Creates a runner around an existing client.
    pub fn with_client(client: Client, config: RunConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Reads page URLs from a sitemap through the runner's client.
    pub async fn sitemap_urls(&self, sitemap_url: &str) -> Result<Vec<String>> {
        fetch_sitemap_urls(&self.client, sitemap_url, &self.config.fetch).await
    }

    /// Extracts `selector` from every URL.
    ///
    /// An empty URL list or a blank selector is a no-op that returns an
    /// empty table. An invalid selector is rejected before any request.
    pub async fn run(&self, urls: &[String], selector: &str) -> Result<ResultTable> {
        if urls.is_empty() || selector.trim().is_empty() {
            debug!(urls = urls.len(), "nothing to run");
            return Ok(ResultTable::default());
        }

        let selector = ContentSelector::parse(selector)?;
        Ok(self.run_with(urls, &selector).await)
    }

    /// Extracts an already compiled selector from every URL.
    ///
    /// Each URL runs on its own tokio task, so fetching and parsing proceed
    /// in parallel on a multi-threaded runtime; a semaphore keeps at most
    /// `concurrency` of them in flight. Rows are appended as tasks complete,
    /// so their order follows completion rather than input. Each URL is
    /// attempted exactly once and a failed page never affects the others.
    pub async fn run_with(&self, urls: &[String], selector: &ContentSelector) -> ResultTable {
        let workers = self.config.concurrency.max(1);
        info!(urls = urls.len(), workers, selector = selector.as_str(), "starting extraction");

        let permits = Arc::new(Semaphore::new(workers));
        let selector = Arc::new(selector.clone());

        let mut tasks: FuturesUnordered<_> = urls
            .iter()
            .map(|url| {
                let permits = Arc::clone(&permits);
                let selector = Arc::clone(&selector);
                let client = self.client.clone();
                let fetch = self.config.fetch.clone();
                let task_url = url.clone();

                let handle = tokio::spawn(async move {
                    let _permit = permits.acquire_owned().await.ok();
                    let outcome = extract_with(&client, &task_url, &selector, &fetch).await;
                    ExtractionResult::new(task_url, outcome)
                });

                let url = url.clone();
                async move { joined_row(url, handle.await) }
            })
            .collect();

        let mut rows = Vec::with_capacity(urls.len());
        while let Some(row) = tasks.next().await {
            rows.push(row);
        }

        let table = ResultTable::from(rows);
        let counts = table.counts();
        info!(
            rows = table.len(),
            text = counts.text,
            not_found = counts.not_found,
            errors = counts.error,
            "extraction finished"
        );

        table
    }
}

/// Turns a finished task into a row; a panicked or cancelled task still
/// yields one `Error` row for its URL.
fn joined_row(url: String, joined: std::result::Result<ExtractionResult, JoinError>) -> ExtractionResult {
    match joined {
        Ok(row) => row,
        Err(e) => {
            error!(url = %url, error = %e, "extraction task failed");
            ExtractionResult::new(url, Outcome::Error(format!("extraction task failed: {}", e)))
        }
    }
}

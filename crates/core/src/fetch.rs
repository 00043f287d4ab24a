//! Content fetching from URLs, files, and stdin.
//!
//! Every HTTP request goes through one [`reqwest::Client`] built by
//! [`build_client`]. The client carries the default headers and timeout and is
//! passed explicitly to the sitemap reader and to every extraction, so a run
//! shares a single connection pool without any process-wide state.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::{Client, Response};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use tracing::debug;
use url::Url;

use crate::{Result, SiftError};

/// Browser identification sent with every request. Some news sites reject
/// the default client identifiers outright.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP client configuration for fetching sitemaps and pages.
///
/// This struct controls timeout and user agent settings for HTTP requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: DEFAULT_TIMEOUT_SECS, user_agent: DEFAULT_USER_AGENT.to_string() }
    }
}

/// Builds the shared HTTP session used for a run.
///
/// The returned client is cheap to clone and safe to use from concurrent
/// tasks. Redirect and TLS handling are reqwest's defaults.
pub fn build_client(config: &FetchConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(SiftError::HttpError)
}

/// Fetches a document body from a URL.
///
/// Performs one GET request through `client`. Non-success statuses are
/// reported as [`SiftError::HttpStatus`] and timeouts as
/// [`SiftError::Timeout`]. The body is decoded with the charset of the
/// response's `Content-Type`, UTF-8 when there is none.
pub async fn fetch_url(client: &Client, url: &str, config: &FetchConfig) -> Result<String> {
    let response = send(client, url, config).await?;
    let content = response.text().await.map_err(|e| map_reqwest_error(e, config))?;

    debug!(url, bytes = content.len(), "fetched");

    Ok(content)
}

/// Fetches a document body from a URL without decoding it.
///
/// Used for XML, whose encoding is declared inside the document rather than
/// in the HTTP headers.
pub async fn fetch_bytes(client: &Client, url: &str, config: &FetchConfig) -> Result<Vec<u8>> {
    let response = send(client, url, config).await?;
    let content = response.bytes().await.map_err(|e| map_reqwest_error(e, config))?;

    debug!(url, bytes = content.len(), "fetched");

    Ok(content.to_vec())
}

async fn send(client: &Client, url: &str, config: &FetchConfig) -> Result<Response> {
    let parsed_url = Url::parse(url.trim()).map_err(|e| SiftError::InvalidUrl(format!("{}: {}", url, e)))?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(SiftError::InvalidUrl(format!(
            "{}: URL must use http:// or https://",
            url
        )));
    }

    debug!(url = %parsed_url, "fetching");

    let response = client.get(parsed_url).send().await.map_err(|e| map_reqwest_error(e, config))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SiftError::HttpStatus { status: status.as_u16(), url: response.url().to_string() });
    }

    Ok(response)
}

fn map_reqwest_error(e: reqwest::Error, config: &FetchConfig) -> SiftError {
    if e.is_timeout() { SiftError::Timeout { timeout: config.timeout } } else { SiftError::HttpError(e) }
}

/// Reads a local file into a string.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(SiftError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(SiftError::from)
    }
}

/// Reads all of standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(SiftError::from)?;

    Ok(buffer)
}

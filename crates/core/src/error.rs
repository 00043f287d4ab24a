//! Error types for sitesift operations.
//!
//! This module defines the main error type [`SiftError`] which represents
//! every failure that can occur while fetching pages, reading sitemaps,
//! loading URL lists and exporting results.
//!
//! Per-page extraction failures are not reported through this type: they are
//! folded into [`Outcome::Error`](crate::Outcome::Error) so that a single bad
//! page never aborts a run.
//!
//! # Example
//!
//! ```rust
//! use sitesift_core::{SiftError, parse_sitemap};
//!
//! match parse_sitemap("<not-xml") {
//!     Ok(urls) => println!("{} urls", urls.len()),
//!     Err(e) if e.is_parse() => println!("bad sitemap: {}", e),
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sitesift operations.
#[derive(Error, Debug)]
pub enum SiftError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// TLS failures and other transport problems.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    ///
    /// Returned when an HTTP request exceeds the configured timeout duration.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// The server answered with a non-success status code.
    #[error("HTTP status {status} for url ({url})")]
    HttpStatus { status: u16, url: String },

    /// Invalid URL provided.
    ///
    /// Returned when a URL cannot be parsed or is malformed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The sitemap body is not well-formed XML.
    #[error("Failed to parse sitemap XML: {0}")]
    SitemapParse(String),

    /// The sitemap parsed but is not a `urlset` in the sitemap namespace.
    #[error("Unexpected sitemap structure: {0}")]
    UnexpectedSitemap(String),

    /// The CSS selector could not be compiled.
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// A CSV URL list has no column literally named `URL`.
    #[error("CSV must contain a column named 'URL'")]
    MissingUrlColumn,

    /// CSV reading or writing errors.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File not found.
    ///
    /// Returned when attempting to read a file that doesn't exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Standard I/O errors for file and stream operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Result serialization failed.
    #[error("Failed to serialize results: {0}")]
    Serialize(String),
}

impl SiftError {
    /// Returns true for HTTP-level failures: bad status, timeout, transport
    /// errors and unusable URLs.
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            SiftError::HttpError(_) | SiftError::Timeout { .. } | SiftError::HttpStatus { .. } | SiftError::InvalidUrl(_)
        )
    }

    /// Returns true when a sitemap was fetched but could not be understood.
    pub fn is_parse(&self) -> bool {
        matches!(self, SiftError::SitemapParse(_) | SiftError::UnexpectedSitemap(_))
    }
}

/// Result type alias for SiftError.
pub type Result<T> = std::result::Result<T, SiftError>;

//! Extract CSS-selected fragments from lists of web pages.
//!
//! URLs come from a sitemap, a CSV file or a plain list ([`UrlSource`]).
//! An [`ExtractionRunner`] fetches them with a bounded number of concurrent
//! requests, applies one selector to each page and collects a
//! [`ResultTable`] that can be exported as CSV or JSON.

pub mod error;
pub mod extract;
pub mod fetch;
pub mod parse;
pub mod runner;
pub mod sitemap;
pub mod source;
pub mod table;

pub use error::{Result, SiftError};
pub use extract::{ExtractionResult, NOT_FOUND_TEXT, Outcome, extract_content, extract_from_html, extract_with};
pub use fetch::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, FetchConfig, build_client, fetch_bytes, fetch_url};
pub use parse::{ContentSelector, Document};
pub use runner::{DEFAULT_CONCURRENCY, ExtractionRunner, RunConfig, RunConfigBuilder};
pub use sitemap::{SITEMAP_NS, fetch_sitemap_urls, parse_sitemap, parse_sitemap_bytes};
pub use source::{UrlSource, urls_from_csv, urls_from_manual};
pub use table::{DEFAULT_EXPORT_FILENAME, OutcomeCounts, ResultTable};

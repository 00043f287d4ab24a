//! Where a run's URLs come from.
//!
//! A run takes its URLs from exactly one source: a sitemap, a CSV file with a
//! `URL` column, or a plain newline-separated list. The resolved list is
//! fixed for the rest of the run.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use reqwest::Client;
use tracing::debug;

use crate::fetch::{FetchConfig, fetch_file, fetch_stdin};
use crate::sitemap::fetch_sitemap_urls;
use crate::table::URL_COLUMN;
use crate::{Result, SiftError};

/// One of the three URL inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlSource {
    /// URL of an XML sitemap.
    Sitemap(String),
    /// CSV file with a `URL` column.
    CsvFile(PathBuf),
    /// Newline-separated URLs.
    Manual(String),
}

impl UrlSource {
    /// Manual list read from a file, or from stdin when `path` is `-`.
    pub fn manual_from_path(path: &str) -> Result<Self> {
        let text = if path == "-" { fetch_stdin()? } else { fetch_file(path)? };
        Ok(UrlSource::Manual(text))
    }

    /// Short label for status messages.
    pub fn label(&self) -> &'static str {
        match self {
            UrlSource::Sitemap(_) => "sitemap",
            UrlSource::CsvFile(_) => "CSV",
            UrlSource::Manual(_) => "manual list",
        }
    }

    /// Produces the page URLs for this source.
    ///
    /// Only [`UrlSource::Sitemap`] touches the network.
    pub async fn resolve(&self, client: &Client, config: &FetchConfig) -> Result<Vec<String>> {
        let urls = match self {
            UrlSource::Sitemap(url) => fetch_sitemap_urls(client, url, config).await?,
            UrlSource::CsvFile(path) => {
                if !path.exists() {
                    return Err(SiftError::FileNotFound(path.clone()));
                }
                urls_from_csv(File::open(path)?)?
            }
            UrlSource::Manual(text) => urls_from_manual(text),
        };

        debug!(source = self.label(), count = urls.len(), "urls loaded");
        Ok(urls)
    }
}

/// Reads the `URL` column of a headered CSV.
///
/// Blank cells are dropped and values are trimmed; row order is kept.
///
/// # Errors
///
/// Returns [`SiftError::MissingUrlColumn`] when no header is exactly `URL`.
pub fn urls_from_csv<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut csv = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);

    let column = csv
        .headers()?
        .iter()
        .position(|header| header.trim_start_matches('\u{feff}') == URL_COLUMN)
        .ok_or(SiftError::MissingUrlColumn)?;

    let mut urls = Vec::new();
    for record in csv.records() {
        let record = record?;
        if let Some(value) = record.get(column).map(str::trim)
            && !value.is_empty()
        {
            urls.push(value.to_string());
        }
    }

    Ok(urls)
}

/// Splits a pasted list into URLs, one per non-blank line.
pub fn urls_from_manual(text: &str) -> Vec<String> {
    text.lines().map(str::trim).filter(|line| !line.is_empty()).map(str::to_string).collect()
}

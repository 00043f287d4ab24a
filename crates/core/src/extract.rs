//! Selector-based content extraction from a single page.
//!
//! Extraction never returns `Err`: every failure is folded into
//! [`Outcome::Error`] so that callers fill a result cell instead of unwinding.

use std::fmt;

use reqwest::Client;
use serde::Serialize;
use tracing::warn;

use crate::fetch::{FetchConfig, fetch_url};
use crate::parse::{ContentSelector, Document};

/// Cell text used when the selector matched nothing.
pub const NOT_FOUND_TEXT: &str = "Content not found";

/// What happened when one page was processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Joined, trimmed text of the first matching element.
    Text(String),
    /// The page loaded but the selector matched nothing.
    NotFound,
    /// Fetching or parsing failed; the message is kept verbatim.
    Error(String),
}

impl Outcome {
    /// Short machine-readable label: `text`, `not_found` or `error`.
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Text(_) => "text",
            Outcome::NotFound => "not_found",
            Outcome::Error(_) => "error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }
}

/// Renders the value shown in the result table: the text itself,
/// `Content not found`, or `Error: <message>`.
impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Text(text) => f.write_str(text),
            Outcome::NotFound => f.write_str(NOT_FOUND_TEXT),
            Outcome::Error(message) => write!(f, "Error: {}", message),
        }
    }
}

/// One row of a result table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub url: String,
    pub outcome: Outcome,
}

impl ExtractionResult {
    pub fn new(url: impl Into<String>, outcome: Outcome) -> Self {
        Self { url: url.into(), outcome }
    }
}

impl Serialize for Outcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Applies a compiled selector to an HTML body.
///
/// Only the first match is used. Its visible descendant text nodes are
/// trimmed and joined with a single space.
pub fn extract_from_html(html: &str, selector: &ContentSelector) -> Outcome {
    let doc = Document::parse(html);
    match doc.select_first(selector) {
        Some(element) => Outcome::Text(element.joined_text()),
        None => Outcome::NotFound,
    }
}

/// Fetches `url` and extracts the first fragment matching `selector`.
///
/// The selector is compiled on every call; an invalid selector becomes an
/// [`Outcome::Error`] like any other failure. Use [`extract_with`] to reuse
/// a compiled selector across many pages.
pub async fn extract_content(client: &Client, url: &str, selector: &str, config: &FetchConfig) -> Outcome {
    match ContentSelector::parse(selector) {
        Ok(selector) => extract_with(client, url, &selector, config).await,
        Err(e) => Outcome::Error(e.to_string()),
    }
}

/// Fetches `url` and applies an already compiled selector.
pub async fn extract_with(client: &Client, url: &str, selector: &ContentSelector, config: &FetchConfig) -> Outcome {
    match fetch_url(client, url, config).await {
        Ok(body) => extract_from_html(&body, selector),
        Err(e) => {
            warn!(url, error = %e, "extraction failed");
            Outcome::Error(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::build_client;
    use httpmock::prelude::*;
    use rstest::rstest;

    const PAGE: &str = r#"<html><head><title>Story</title></head>
        <body>
            <h1 class="title">Hello World</h1>
            <article><p>Lead  text.</p>
            <p>Body <strong>bold</strong>.</p></article>
        </body></html>"#;

    fn sel(s: &str) -> ContentSelector {
        ContentSelector::parse(s).unwrap()
    }

    #[rstest]
    #[case("h1.title", Outcome::Text("Hello World".to_string()))]
    #[case("article", Outcome::Text("Lead  text. Body bold .".to_string()))]
    #[case("title", Outcome::Text("Story".to_string()))]
    #[case(".missing", Outcome::NotFound)]
    fn test_extract_from_html(#[case] selector: &str, #[case] expected: Outcome) {
        assert_eq!(extract_from_html(PAGE, &sel(selector)), expected);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Text("Hi".into()).to_string(), "Hi");
        assert_eq!(Outcome::NotFound.to_string(), "Content not found");
        assert_eq!(Outcome::Error("boom".into()).to_string(), "Error: boom");
    }

    #[test]
    fn test_outcome_kind() {
        assert_eq!(Outcome::Text(String::new()).kind(), "text");
        assert_eq!(Outcome::NotFound.kind(), "not_found");
        assert!(Outcome::Error("x".into()).is_error());
    }

    #[test]
    fn test_empty_match_is_empty_text() {
        let outcome = extract_from_html("<div class='x'>   </div>", &sel(".x"));
        assert_eq!(outcome, Outcome::Text(String::new()));
    }

    #[tokio::test]
    async fn test_extract_content_from_server() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/story");
            then.status(200).header("content-type", "text/html").body(PAGE);
        });

        let config = FetchConfig::default();
        let client = build_client(&config).unwrap();
        let outcome = extract_content(&client, &server.url("/story"), "h1.title", &config).await;

        mock.assert();
        assert_eq!(outcome, Outcome::Text("Hello World".to_string()));
    }

    #[tokio::test]
    async fn test_extract_content_http_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/forbidden");
            then.status(403);
        });

        let config = FetchConfig::default();
        let client = build_client(&config).unwrap();
        let outcome = extract_content(&client, &server.url("/forbidden"), "h1", &config).await;

        assert!(outcome.is_error());
        assert!(outcome.to_string().starts_with("Error: "));
        assert!(outcome.to_string().contains("403"));
    }

    #[tokio::test]
    async fn test_extract_content_unreachable() {
        let config = FetchConfig::default();
        let client = build_client(&config).unwrap();
        let outcome = extract_content(&client, "http://127.0.0.1:1/story", "h1", &config).await;
        assert!(outcome.to_string().starts_with("Error: "));
    }

    #[tokio::test]
    async fn test_extract_content_invalid_selector() {
        let config = FetchConfig::default();
        let client = build_client(&config).unwrap();
        let outcome = extract_content(&client, "http://127.0.0.1:1/story", "[[", &config).await;
        assert!(matches!(outcome, Outcome::Error(ref m) if m.contains("Invalid selector")));
    }
}

//! Sitemap reading.
//!
//! A sitemap is an XML `urlset` in the `http://www.sitemaps.org/schemas/sitemap/0.9`
//! namespace. Google News sitemaps add `news:` children to each `url`; those
//! are ignored, only `loc` is read.

use encoding_rs::{Encoding, UTF_8};
use reqwest::Client;
use sxd_document::dom::ChildOfRoot;
use sxd_document::parser;
use sxd_xpath::{Context, Factory, Value};
use tracing::debug;

use crate::fetch::{FetchConfig, fetch_bytes};
use crate::{Result, SiftError};

/// Namespace of the sitemap protocol.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Namespace of the Google News sitemap extension.
pub const NEWS_NS: &str = "http://www.google.com/schemas/sitemap-news/0.9";

/// First `loc` of every `url` directly under the root `urlset`.
const LOC_XPATH: &str = "/sm:urlset/sm:url/sm:loc[1]";

/// Fetches a sitemap and returns its page URLs in document order.
///
/// Issues a single GET through the shared client. Any failure (transport,
/// status, malformed XML or a document that is not a `urlset`) is returned
/// as an error; nothing is recovered from a partially readable sitemap.
///
/// The body is decoded from the document's own byte order mark or XML
/// declaration, not from the HTTP charset.
pub async fn fetch_sitemap_urls(client: &Client, sitemap_url: &str, config: &FetchConfig) -> Result<Vec<String>> {
    let body = fetch_bytes(client, sitemap_url, config).await?;
    let urls = parse_sitemap_bytes(&body)?;
    debug!(sitemap = sitemap_url, count = urls.len(), "sitemap parsed");
    Ok(urls)
}

/// Decodes a raw sitemap body and parses it with [`parse_sitemap`].
///
/// A byte order mark wins, then the `encoding` of the XML declaration;
/// UTF-8 is assumed when neither is present or the label is unknown.
pub fn parse_sitemap_bytes(body: &[u8]) -> Result<Vec<String>> {
    let encoding = declared_encoding(body).unwrap_or(UTF_8);
    let (xml, used, had_errors) = encoding.decode(body);
    if had_errors {
        debug!(encoding = used.name(), "sitemap contains undecodable bytes");
    }
    parse_sitemap(&xml)
}

/// Reads `encoding="..."` from an ASCII-compatible XML declaration.
fn declared_encoding(body: &[u8]) -> Option<&'static Encoding> {
    let rest = body.strip_prefix(b"<?xml")?;
    let decl = &rest[..rest.windows(2).position(|w| w == b"?>")?];
    let at = decl.windows(8).position(|w| w == b"encoding")?;

    let value = decl[at + 8..].trim_ascii_start().strip_prefix(b"=")?.trim_ascii_start();
    let (&quote, value) = value.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let end = value.iter().position(|&b| b == quote)?;
    Encoding::for_label(&value[..end])
}

/// Parses a sitemap document into the text of each `<url><loc>`.
///
/// # Errors
///
/// * [`SiftError::SitemapParse`] if the body is not well-formed XML.
/// * [`SiftError::UnexpectedSitemap`] if the root is not a sitemap `urlset`.
pub fn parse_sitemap(xml: &str) -> Result<Vec<String>> {
    let xml = xml.trim_start_matches('\u{feff}');
    let package = parser::parse(xml).map_err(|e| SiftError::SitemapParse(e.to_string()))?;
    let document = package.as_document();

    let root = document
        .root()
        .children()
        .into_iter()
        .find_map(|child| match child {
            ChildOfRoot::Element(element) => Some(element),
            _ => None,
        })
        .ok_or_else(|| SiftError::UnexpectedSitemap("document has no root element".to_string()))?;

    let name = root.name();
    if name.namespace_uri() != Some(SITEMAP_NS) || name.local_part() != "urlset" {
        return Err(SiftError::UnexpectedSitemap(format!(
            "expected <urlset xmlns=\"{}\">, found <{}>",
            SITEMAP_NS,
            name.local_part()
        )));
    }

    let xpath = Factory::new()
        .build(LOC_XPATH)
        .map_err(|e| SiftError::UnexpectedSitemap(format!("Invalid XPath '{}': {}", LOC_XPATH, e)))?
        .ok_or_else(|| SiftError::UnexpectedSitemap(format!("Invalid XPath: {}", LOC_XPATH)))?;

    let mut context = Context::new();
    context.set_namespace("sm", SITEMAP_NS);
    context.set_namespace("news", NEWS_NS);

    let value = xpath
        .evaluate(&context, document.root())
        .map_err(|e| SiftError::UnexpectedSitemap(e.to_string()))?;

    match value {
        Value::Nodeset(nodeset) => Ok(nodeset
            .document_order()
            .into_iter()
            .map(|node| node.string_value().trim().to_string())
            .filter(|loc| !loc.is_empty())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

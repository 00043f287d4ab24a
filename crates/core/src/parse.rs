//! HTML parsing and CSS selection.
//!
//! This module provides the [`Document`], [`Element`] and [`ContentSelector`]
//! types. Parsing uses the lenient HTML5 tree builder from `scraper`, so
//! malformed markup, unknown tags and unclosed elements never fail: they are
//! recovered the way a browser would.
//!
//! # Example
//!
//! ```rust
//! use sitesift_core::parse::{ContentSelector, Document};
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1 class="title">Hello <em>World</em></h1>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html);
//! let selector = ContentSelector::parse("h1.title").unwrap();
//! let heading = doc.select_first(&selector).unwrap();
//! assert_eq!(heading.joined_text(), "Hello World");
//! ```

use scraper::{ElementRef, Html, Node, Selector};

use crate::{Result, SiftError};

/// Elements whose text never counts as visible content.
const NON_CONTENT_TAGS: [&str; 3] = ["script", "style", "template"];

/// A compiled CSS selector shared by every page of a run.
///
/// Compiling once up front means a typo in the selector is reported before
/// any request is made.
#[derive(Debug, Clone)]
pub struct ContentSelector {
    source: String,
    selector: Selector,
}

impl ContentSelector {
    /// Compiles a CSS selector string.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::InvalidSelector`] if the string is empty or is
    /// not a valid selector.
    pub fn parse(selector: &str) -> Result<Self> {
        let source = selector.trim();
        if source.is_empty() {
            return Err(SiftError::InvalidSelector("selector is empty".to_string()));
        }

        let selector = Selector::parse(source).map_err(|e| SiftError::InvalidSelector(format!("{}: {}", source, e)))?;

        Ok(Self { source: source.to_string(), selector })
    }

    /// The selector text as given (trimmed).
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Represents a parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// This never fails; broken markup is repaired by the HTML5 parser.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Returns the first element matching `selector` in document order.
    pub fn select_first(&'_ self, selector: &ContentSelector) -> Option<Element<'_>> {
        self.html.select(&selector.selector).next().map(|element| Element { element })
    }
}

/// A wrapper around scraper's ElementRef.
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Visible descendant text nodes, each trimmed, empty ones dropped.
    ///
    /// Text inside `script`, `style` and `template` is skipped.
    pub fn text_fragments(&self) -> Vec<&'a str> {
        let mut fragments = Vec::new();
        collect_text(self.element, &mut fragments);
        fragments
    }

    /// Visible text joined with a single space.
    ///
    /// Whitespace inside a text node is kept as-is; only the edges of each
    /// node are stripped before joining.
    pub fn joined_text(&self) -> String {
        self.text_fragments().join(" ")
    }
}

fn collect_text<'a>(element: ElementRef<'a>, out: &mut Vec<&'a str>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    out.push(trimmed);
                }
            }
            Node::Element(el) if NON_CONTENT_TAGS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(child_ref, out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <title> Test Page </title>
            <style>.title { color: red }</style>
        </head>
        <body>
            <h1 class="title">Hello World</h1>
            <div class="story">
                <p>First   paragraph</p>
                <script>var tracking = 1;</script>
                <p>Second <a href="/more">link</a> tail</p>
            </div>
            <p class="content">Paragraph 1</p>
            <p class="content">Paragraph 2</p>
        </body>
        </html>
    "#;

    fn sel(s: &str) -> ContentSelector {
        ContentSelector::parse(s).unwrap()
    }

    #[test]
    fn test_parse_document() {
        let doc = Document::parse(SAMPLE_HTML);
        let title = doc.select_first(&sel("title")).unwrap();
        assert_eq!(title.joined_text(), "Test Page");
    }

    #[test]
    fn test_select_first_takes_document_order() {
        let doc = Document::parse(SAMPLE_HTML);
        let first = doc.select_first(&sel("p.content")).unwrap();
        assert_eq!(first.joined_text(), "Paragraph 1");
    }

    #[test]
    fn test_joined_text_keeps_inner_whitespace() {
        let doc = Document::parse(SAMPLE_HTML);
        let story = doc.select_first(&sel("div.story")).unwrap();
        assert_eq!(story.joined_text(), "First   paragraph Second link tail");
    }

    #[test]
    fn test_script_text_excluded() {
        let doc = Document::parse(SAMPLE_HTML);
        let story = doc.select_first(&sel(".story")).unwrap();
        assert!(!story.joined_text().contains("tracking"));
    }

    #[test]
    fn test_no_match() {
        let doc = Document::parse(SAMPLE_HTML);
        assert!(doc.select_first(&sel(".missing")).is_none());
    }

    #[test]
    fn test_invalid_selector() {
        assert!(matches!(ContentSelector::parse("[[invalid"), Err(SiftError::InvalidSelector(_))));
        assert!(matches!(ContentSelector::parse("   "), Err(SiftError::InvalidSelector(_))));
    }

    #[test]
    fn test_malformed_markup_is_tolerated() {
        let doc = Document::parse("<div class='x'><p>open <b>bold <i>nested</div><unknown>tail");
        let div = doc.select_first(&sel("div.x")).unwrap();
        assert_eq!(div.joined_text(), "open bold nested");
    }
}

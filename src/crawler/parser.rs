//! HTML query capability
//!
//! The crawl logic never touches a parser directly. It asks a `DomQuery`
//! for an `HtmlDocument` and reads owned `ElementSnapshot`s out of it, so a
//! document never has to live across an await point and tests can swap in
//! any engine. `ScraperDom` is the production engine.

use crate::{DomError, DomResult};
use scraper::{ElementRef, Html, Selector};

/// Owned view of one matched element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSnapshot {
    attrs: Vec<(String, String)>,
    text: String,
    parent_html: Option<String>,
}

impl ElementSnapshot {
    pub fn new(
        attrs: Vec<(String, String)>,
        text: impl Into<String>,
        parent_html: Option<String>,
    ) -> Self {
        Self {
            attrs,
            text: text.into(),
            parent_html,
        }
    }

    /// Value of an attribute, if present
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Text content, trimmed with inner whitespace runs collapsed
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Outer HTML of the parent element, for scoped queries
    pub fn parent_html(&self) -> Option<&str> {
        self.parent_html.as_deref()
    }
}

/// A parsed page that answers CSS selector queries
pub trait HtmlDocument {
    /// All elements matching `selector`, in document order
    fn select(&self, selector: &str) -> DomResult<Vec<ElementSnapshot>>;

    /// First element matching `selector`
    fn select_first(&self, selector: &str) -> DomResult<Option<ElementSnapshot>> {
        Ok(self.select(selector)?.into_iter().next())
    }

    /// Last element matching `selector`
    fn select_last(&self, selector: &str) -> DomResult<Option<ElementSnapshot>> {
        Ok(self.select(selector)?.into_iter().last())
    }

    /// Texts of all matches joined by single spaces
    fn joined_text(&self, selector: &str) -> DomResult<String> {
        let texts: Vec<String> = self
            .select(selector)?
            .into_iter()
            .map(|el| el.text)
            .filter(|text| !text.is_empty())
            .collect();
        Ok(texts.join(" "))
    }
}

/// Parses HTML into queryable documents
pub trait DomQuery: Send + Sync {
    /// Parses a full page
    fn parse_document(&self, html: &str) -> Box<dyn HtmlDocument>;

    /// Parses a fragment such as an element's outer HTML
    fn parse_fragment(&self, html: &str) -> Box<dyn HtmlDocument>;

    /// Text of `selector` matches among the descendants of `element`'s parent
    ///
    /// This is how sibling text (for example a `<small>` next to a link) is
    /// read. Returns an empty string when the element has no parent.
    fn parent_scoped_text(&self, element: &ElementSnapshot, selector: &str) -> DomResult<String> {
        match element.parent_html() {
            Some(parent) => self.parse_fragment(parent).joined_text(selector),
            None => Ok(String::new()),
        }
    }
}

/// Builds the `a[href*="marker"]` selector for a path marker
pub fn anchor_selector(marker: &str) -> String {
    format!(r#"a[href*="{}"]"#, marker)
}

/// DOM engine backed by the `scraper` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperDom;

struct ScraperDocument {
    html: Html,
}

impl DomQuery for ScraperDom {
    fn parse_document(&self, html: &str) -> Box<dyn HtmlDocument> {
        Box::new(ScraperDocument {
            html: Html::parse_document(html),
        })
    }

    fn parse_fragment(&self, html: &str) -> Box<dyn HtmlDocument> {
        Box::new(ScraperDocument {
            html: Html::parse_fragment(html),
        })
    }
}

impl HtmlDocument for ScraperDocument {
    fn select(&self, selector: &str) -> DomResult<Vec<ElementSnapshot>> {
        let parsed = Selector::parse(selector).map_err(|e| DomError::Selector {
            selector: selector.to_string(),
            message: format!("{:?}", e),
        })?;

        Ok(self.html.select(&parsed).map(snapshot).collect())
    }
}

fn snapshot(element: ElementRef<'_>) -> ElementSnapshot {
    let attrs = element
        .value()
        .attrs()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

    let text = element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let parent_html = element
        .parent()
        .and_then(ElementRef::wrap)
        .map(|parent| parent.html());

    ElementSnapshot::new(attrs, text, parent_html)
}

//! Link discovery on listing pages
//!
//! Category discovery runs against the site root; movie link discovery
//! runs against each category page. Both select anchors whose href contains
//! a path marker, resolve them against the site base URL, and drop repeats
//! while keeping first-seen order.

use crate::crawler::fetcher::HttpFetch;
use crate::crawler::parser::{anchor_selector, DomQuery};
use crate::url::{absolutize, dedup_preserving_order};
use crate::{CrawlerError, DomResult};
use url::Url;

/// Extracts marker-matching anchor targets from a page
///
/// Anchors with an empty or unusable href are skipped.
pub fn extract_marked_links(
    dom: &dyn DomQuery,
    html: &str,
    base_url: &Url,
    marker: &str,
) -> DomResult<Vec<String>> {
    let document = dom.parse_document(html);
    let anchors = document.select(&anchor_selector(marker))?;

    Ok(dedup_preserving_order(
        anchors
            .iter()
            .filter_map(|anchor| anchor.attr("href"))
            .filter_map(|href| absolutize(href, base_url)),
    ))
}

/// Shared fetch-then-extract step for one listing tier
struct MarkedLinkDiscovery<'a> {
    fetcher: &'a dyn HttpFetch,
    dom: &'a dyn DomQuery,
    base_url: &'a Url,
    marker: &'a str,
}

impl<'a> MarkedLinkDiscovery<'a> {
    async fn discover(&self, page_url: &str) -> Result<Vec<String>, CrawlerError> {
        let html = self.fetcher.get(page_url, None).await?;
        let links = extract_marked_links(self.dom, &html, self.base_url, self.marker)?;
        tracing::debug!(
            "Found {} links matching '{}' on {}",
            links.len(),
            self.marker,
            page_url
        );
        Ok(links)
    }
}

/// Finds category listing URLs on the site root
pub struct CategoryDiscovery<'a> {
    inner: MarkedLinkDiscovery<'a>,
}

impl<'a> CategoryDiscovery<'a> {
    pub fn new(
        fetcher: &'a dyn HttpFetch,
        dom: &'a dyn DomQuery,
        base_url: &'a Url,
        category_marker: &'a str,
    ) -> Self {
        Self {
            inner: MarkedLinkDiscovery {
                fetcher,
                dom,
                base_url,
                marker: category_marker,
            },
        }
    }

    /// Fetches the root page and returns its category URLs
    ///
    /// A fetch failure is returned to the caller; there is no fallback.
    pub async fn discover(&self, root_url: &str) -> Result<Vec<String>, CrawlerError> {
        self.inner.discover(root_url).await
    }
}

/// Finds item detail URLs on a category page
pub struct MovieLinkDiscovery<'a> {
    inner: MarkedLinkDiscovery<'a>,
}

impl<'a> MovieLinkDiscovery<'a> {
    pub fn new(
        fetcher: &'a dyn HttpFetch,
        dom: &'a dyn DomQuery,
        base_url: &'a Url,
        item_marker: &'a str,
    ) -> Self {
        Self {
            inner: MarkedLinkDiscovery {
                fetcher,
                dom,
                base_url,
                marker: item_marker,
            },
        }
    }

    /// Fetches a category page and returns its detail URLs
    pub async fn discover(&self, category_url: &str) -> Result<Vec<String>, CrawlerError> {
        self.inner.discover(category_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::parser::ScraperDom;

    fn base() -> Url {
        Url::parse("https://listing.example.com").unwrap()
    }

    #[test]
    fn test_extract_relative_and_absolute() {
        let html = r#"<body>
            <a href="/category/bollywood">Bollywood</a>
            <a href="https://listing.example.com/category/hollywood">Hollywood</a>
            <a href="/movie/1/x.html">Not a category</a>
        </body>"#;
        let links = extract_marked_links(&ScraperDom, html, &base(), "/category/").unwrap();
        assert_eq!(
            links,
            vec![
                "https://listing.example.com/category/bollywood",
                "https://listing.example.com/category/hollywood",
            ]
        );
    }

    #[test]
    fn test_extract_dedups_preserving_order() {
        let html = r#"<body>
            <a href="/movie/2/b.html">B</a>
            <a href="/movie/1/a.html">A</a>
            <a href="/movie/2/b.html">B again</a>
            <a href="https://listing.example.com/movie/1/a.html">A absolute</a>
        </body>"#;
        let links = extract_marked_links(&ScraperDom, html, &base(), "/movie/").unwrap();
        assert_eq!(
            links,
            vec![
                "https://listing.example.com/movie/2/b.html",
                "https://listing.example.com/movie/1/a.html",
            ]
        );
    }

    #[test]
    fn test_extract_none() {
        let html = "<body><p>No links here</p><a>no href</a></body>";
        let links = extract_marked_links(&ScraperDom, html, &base(), "/category/").unwrap();
        assert!(links.is_empty());
    }
}

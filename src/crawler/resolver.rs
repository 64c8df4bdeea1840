use crate::catalog::ResolveOutcome;
use crate::crawler::fetcher::HttpFetch;
use crate::crawler::parser::{anchor_selector, DomQuery};
use crate::url::absolutize;
use url::Url;

/// Follows one server/redirect page to its final download URL
///
/// Never fails: transport errors become `TransportError`, a page without a
/// download anchor becomes `NotFound`.
pub struct ServerLinkResolver<'a> {
    fetcher: &'a dyn HttpFetch,
    dom: &'a dyn DomQuery,
    base_url: &'a Url,
    download_marker: &'a str,
}

impl<'a> ServerLinkResolver<'a> {
    pub fn new(
        fetcher: &'a dyn HttpFetch,
        dom: &'a dyn DomQuery,
        base_url: &'a Url,
        download_marker: &'a str,
    ) -> Self {
        Self {
            fetcher,
            dom,
            base_url,
            download_marker,
        }
    }

    /// Resolves `server_url`, sending the detail page as Referer
    pub async fn resolve(&self, server_url: &str, referer: &str) -> ResolveOutcome {
        let html = match self.fetcher.get(server_url, Some(referer)).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Failed to resolve server link {}: {}", server_url, e);
                return ResolveOutcome::TransportError;
            }
        };

        match self.find_download_link(&html) {
            Some(url) => ResolveOutcome::Resolved(url),
            None => {
                tracing::debug!("No download link on {}", server_url);
                ResolveOutcome::NotFound
            }
        }
    }

    /// First usable download anchor on the page, made absolute
    fn find_download_link(&self, html: &str) -> Option<String> {
        let document = self.dom.parse_document(html);
        let anchors = match document.select(&anchor_selector(self.download_marker)) {
            Ok(anchors) => anchors,
            Err(e) => {
                tracing::warn!("Download link query failed: {}", e);
                return None;
            }
        };

        anchors
            .iter()
            .filter_map(|anchor| anchor.attr("href"))
            .find_map(|href| absolutize(href, self.base_url))
    }
}

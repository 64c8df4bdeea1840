//! Item detail extraction
//!
//! A detail page yields one `Movie`: title, id, year, thumbnail and
//! description from the page itself, plus one `DownloadLink` per
//! server-link anchor, each followed through `ServerLinkResolver`.

use crate::catalog::{DownloadLink, Movie};
use crate::config::SiteConfig;
use crate::crawler::fetcher::HttpFetch;
use crate::crawler::pacing::PacingPolicy;
use crate::crawler::parser::{anchor_selector, DomQuery};
use crate::crawler::resolver::ServerLinkResolver;
use crate::extract::{FieldExtractors, SizeInput, TitleInput};
use crate::state::CrawlState;
use crate::url::absolutize;
use crate::DomResult;
use url::Url;

/// Sibling elements that may carry the file size
const SIZE_CONTEXT_SELECTOR: &str = "small, span";

/// Result of one detail extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The URL was claimed earlier; nothing was fetched
    AlreadyProcessed,

    /// The movie record was produced
    Completed(Movie),

    /// The detail page could not be fetched or read; nothing is stored
    Abandoned,
}

/// One server-link anchor, read off the detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEntry {
    pub server_url: String,
    pub quality: String,
    pub format: String,
    pub size: String,
}

/// Everything taken from a detail page before any server page is fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPage {
    pub id: String,
    pub title: String,
    pub year: String,
    pub thumbnail: String,
    pub description: String,
    pub servers: Vec<ServerEntry>,
}

/// Extracts one movie per detail URL
pub struct MovieDetailExtractor<'a> {
    fetcher: &'a dyn HttpFetch,
    dom: &'a dyn DomQuery,
    base_url: &'a Url,
    site: &'a SiteConfig,
    fields: &'a FieldExtractors,
    pacing: &'a PacingPolicy,
    resolver: ServerLinkResolver<'a>,
}

impl<'a> MovieDetailExtractor<'a> {
    pub fn new(
        fetcher: &'a dyn HttpFetch,
        dom: &'a dyn DomQuery,
        base_url: &'a Url,
        site: &'a SiteConfig,
        fields: &'a FieldExtractors,
        pacing: &'a PacingPolicy,
    ) -> Self {
        Self {
            fetcher,
            dom,
            base_url,
            site,
            fields,
            pacing,
            resolver: ServerLinkResolver::new(fetcher, dom, base_url, &site.download_marker),
        }
    }

    /// Extracts the movie at `url`
    ///
    /// The URL is claimed in `state` before the first request, so a crash
    /// mid-extraction never re-queues it. Claimed URLs return
    /// `AlreadyProcessed` without touching the network.
    pub async fn extract(&self, url: &str, category: &str, state: &mut CrawlState) -> Extraction {
        if !state.mark_processed(url) {
            return Extraction::AlreadyProcessed;
        }

        let html = match self.fetcher.get(url, None).await {
            Ok(html) => html,
            Err(e) => {
                tracing::error!("Failed to scrape {}: {}", url, e);
                return Extraction::Abandoned;
            }
        };

        let page = match self.parse_detail_page(url, &html) {
            Ok(page) => page,
            Err(e) => {
                tracing::error!("Failed to read detail page {}: {}", url, e);
                return Extraction::Abandoned;
            }
        };

        let mut links = Vec::with_capacity(page.servers.len());
        for server in page.servers {
            let outcome = self.resolver.resolve(&server.server_url, url).await;
            tracing::debug!("  {} -> {}", server.server_url, outcome);

            links.push(DownloadLink {
                quality: server.quality,
                format: server.format,
                size: server.size,
                server_url: server.server_url,
                download_url: outcome.into(),
            });

            self.pacing.after_link().await;
        }

        Extraction::Completed(Movie {
            id: page.id,
            title: page.title,
            url: url.to_string(),
            thumbnail: page.thumbnail,
            category: category.to_string(),
            year: page.year,
            description: page.description,
            links,
        })
    }

    /// Reads the page-level fields and server entries from detail HTML
    pub fn parse_detail_page(&self, url: &str, html: &str) -> DomResult<DetailPage> {
        let document = self.dom.parse_document(html);

        let item_anchor_text = document
            .select_last(&anchor_selector(&self.site.item_marker))?
            .map(|anchor| anchor.text().to_string())
            .unwrap_or_default();

        let server_anchors = document.select(&anchor_selector(&self.site.server_marker))?;

        let title_input = TitleInput {
            item_anchor_text,
            server_anchor_text: server_anchors
                .first()
                .map(|anchor| anchor.text().to_string())
                .unwrap_or_default(),
        };
        let (title, title_source) = self.fields.title.resolve_traced(&title_input);
        if title_source.is_none() {
            tracing::debug!("No title found on {}", url);
        }

        let thumbnail = document
            .select_first(&format!(r#"img[src*="{}"]"#, self.site.poster_marker))?
            .and_then(|img| img.attr("src").and_then(|src| absolutize(src, self.base_url)))
            .unwrap_or_default();

        let description = document
            .select_first(r#"meta[name="description"]"#)?
            .and_then(|meta| meta.attr("content").map(|c| c.trim().to_string()))
            .unwrap_or_default();

        let mut servers = Vec::with_capacity(server_anchors.len());
        for anchor in &server_anchors {
            let server_url = match anchor.attr("href").and_then(|h| absolutize(h, self.base_url)) {
                Some(server_url) => server_url,
                None => continue,
            };

            let text = anchor.text();
            let size_input = SizeInput {
                context_text: self.dom.parent_scoped_text(anchor, SIZE_CONTEXT_SELECTOR)?,
                anchor_text: text.to_string(),
            };

            servers.push(ServerEntry {
                server_url,
                quality: self.fields.quality.resolve(text),
                format: self.fields.format.resolve(text),
                size: self.fields.size.resolve(&size_input),
            });
        }

        Ok(DetailPage {
            id: self.fields.id.resolve(url),
            year: self.fields.year.resolve(&title),
            title,
            thumbnail,
            description,
            servers,
        })
    }
}

//! Crawler module for page fetching and catalog assembly
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a Referer-aware client
//! - HTML querying behind a snapshot-returning capability
//! - Category, item and download link discovery
//! - Fixed-delay pacing
//! - Overall crawl coordination

mod coordinator;
mod detail;
mod discovery;
mod fetcher;
mod pacing;
mod parser;
mod resolver;

pub use coordinator::{parse_limit, run_crawl, Coordinator, RunLimits, RunPhase, RunReport};
pub use detail::{DetailPage, Extraction, MovieDetailExtractor, ServerEntry};
pub use discovery::{extract_marked_links, CategoryDiscovery, MovieLinkDiscovery};
pub use fetcher::{build_http_client, HttpFetch, ReqwestFetcher};
pub use pacing::PacingPolicy;
pub use parser::{anchor_selector, DomQuery, ElementSnapshot, HtmlDocument, ScraperDom};
pub use resolver::ServerLinkResolver;

use crate::config::Config;
use crate::CrawlerError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Resume from the progress checkpoint unless `fresh` is set
/// 2. Discover categories on the site root
/// 3. Walk each category's detail pages and their server links
/// 4. Checkpoint every `checkpoint-interval` movies
/// 5. Write the completion file
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `limits` - Optional category and per-category movie caps
/// * `fresh` - Ignore any existing progress checkpoint
///
/// # Returns
///
/// * `Ok(RunReport)` - Crawl completed successfully
/// * `Err(CrawlerError)` - The root listing or the completion write failed
pub async fn crawl(
    config: Config,
    limits: RunLimits,
    fresh: bool,
) -> Result<RunReport, CrawlerError> {
    run_crawl(config, limits, fresh).await
}

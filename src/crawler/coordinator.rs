//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Resuming from the progress checkpoint
//! - Discovering categories and per-category detail links
//! - Driving detail extraction in discovery order
//! - Periodic and final persistence
//! - Pacing between requests

use crate::config::{validate, Config};
use crate::crawler::detail::{Extraction, MovieDetailExtractor};
use crate::crawler::discovery::{CategoryDiscovery, MovieLinkDiscovery};
use crate::crawler::fetcher::{HttpFetch, ReqwestFetcher};
use crate::crawler::pacing::PacingPolicy;
use crate::crawler::parser::{DomQuery, ScraperDom};
use crate::extract::FieldExtractors;
use crate::output::ScraperStats;
use crate::state::CrawlState;
use crate::storage::{CheckpointStore, FsCheckpointStore};
use crate::url::{category_name, parse_base_url};
use crate::CrawlerError;
use std::time::Instant;
use url::Url;

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    LoadingCheckpoint,
    DiscoveringCategories,
    DiscoveringLinks,
    ExtractingDetail,
    Accumulating,
    PeriodicCheckpoint,
    FinalPersist,
    Done,
}

/// Optional caps on how much of the site a run visits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunLimits {
    /// Visit at most this many categories, in discovery order
    pub max_categories: Option<usize>,

    /// Visit at most this many movies per category, in discovery order
    pub max_movies_per_category: Option<usize>,
}

impl RunLimits {
    pub fn new(max_categories: Option<usize>, max_movies_per_category: Option<usize>) -> Self {
        Self {
            max_categories,
            max_movies_per_category,
        }
    }

    /// No caps
    pub fn unbounded() -> Self {
        Self::default()
    }
}

/// Parses a limit argument leniently
///
/// Missing, non-numeric, negative and zero values all mean "no limit".
pub fn parse_limit(arg: Option<&str>) -> Option<usize> {
    arg.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|limit| *limit > 0)
}

fn take_prefix(items: Vec<String>, limit: Option<usize>) -> Vec<String> {
    match limit {
        Some(limit) => items.into_iter().take(limit).collect(),
        None => items,
    }
}

/// Counters for one completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Categories found on the root page
    pub categories_found: usize,

    /// Categories whose listing page loaded
    pub categories_visited: usize,

    /// Categories whose listing page failed
    pub categories_failed: usize,

    /// Movies extracted during this run
    pub movies_extracted: usize,

    /// Detail pages abandoned during this run
    pub movies_failed: usize,

    /// Detail URLs skipped because they were already processed
    pub movies_skipped: usize,

    /// Movies in the final catalog, including resumed ones
    pub total_movies: usize,

    /// Download links in the final catalog
    pub total_links: usize,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    base_url: Url,
    fields: FieldExtractors,
    fetcher: Box<dyn HttpFetch>,
    dom: Box<dyn DomQuery>,
    store: Box<dyn CheckpointStore>,
    pacing: PacingPolicy,
    limits: RunLimits,
    fresh: bool,
    state: CrawlState,
    phase: RunPhase,
}

impl Coordinator {
    /// Creates a coordinator wired to the network and the output directory
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlerError)` - Invalid configuration or HTTP client failure
    pub fn new(config: Config) -> Result<Self, CrawlerError> {
        let fetcher = ReqwestFetcher::new(&config.http)?;
        let store = FsCheckpointStore::new(&config.output.directory);
        let pacing = PacingPolicy::from(&config.pacing);

        Ok(Self::with_capabilities(
            config,
            Box::new(fetcher),
            Box::new(ScraperDom),
            Box::new(store),
        )?
        .with_pacing(pacing))
    }

    /// Creates a coordinator with injected capabilities
    ///
    /// The configuration is validated first. Pacing starts at the configured
    /// delays; override with `with_pacing`.
    pub fn with_capabilities(
        config: Config,
        fetcher: Box<dyn HttpFetch>,
        dom: Box<dyn DomQuery>,
        store: Box<dyn CheckpointStore>,
    ) -> Result<Self, CrawlerError> {
        validate(&config)?;
        let base_url = parse_base_url(&config.site.base_url)?;
        let fields = FieldExtractors::new(&config.site);
        let pacing = PacingPolicy::from(&config.pacing);

        Ok(Self {
            config,
            base_url,
            fields,
            fetcher,
            dom,
            store,
            pacing,
            limits: RunLimits::unbounded(),
            fresh: false,
            state: CrawlState::new(),
            phase: RunPhase::Idle,
        })
    }

    pub fn with_pacing(mut self, pacing: PacingPolicy) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_limits(mut self, limits: RunLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Ignore any progress checkpoint when the run starts
    pub fn fresh(mut self, fresh: bool) -> Self {
        self.fresh = fresh;
        self
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    pub fn into_state(self) -> CrawlState {
        self.state
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Runs the crawl to completion
    ///
    /// Only a failure to list the site root, or to write the completion
    /// file, is returned as an error. Category and detail failures are
    /// logged and skipped.
    pub async fn run(&mut self) -> Result<RunReport, CrawlerError> {
        let start_time = Instant::now();
        let mut report = RunReport::default();

        self.transition(RunPhase::LoadingCheckpoint);
        self.load_checkpoint();

        self.transition(RunPhase::DiscoveringCategories);
        let root_url = self.config.site.base_url.clone();
        let categories = CategoryDiscovery::new(
            self.fetcher.as_ref(),
            self.dom.as_ref(),
            &self.base_url,
            &self.config.site.category_marker,
        )
        .discover(&root_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to discover categories on {}: {}", root_url, e);
            e
        })?;

        tracing::info!("Found {} categories", categories.len());
        report.categories_found = categories.len();

        let selected = take_prefix(categories, self.limits.max_categories);
        let total = selected.len();

        for (index, category_url) in selected.iter().enumerate() {
            tracing::info!("[{}/{}] {}", index + 1, total, category_name(category_url));
            self.crawl_category(category_url, &mut report).await;
            self.pacing.after_category().await;
        }

        self.transition(RunPhase::FinalPersist);
        let final_file = self.config.output.final_file.clone();
        self.save(&final_file)?;

        let snapshot = self.state.snapshot();
        report.total_movies = snapshot.total_movies;
        report.total_links = snapshot.total_links;

        self.transition(RunPhase::Done);
        tracing::info!(
            "Crawl completed: {} movies ({} new) in {:?}",
            report.total_movies,
            report.movies_extracted,
            start_time.elapsed()
        );

        Ok(report)
    }

    /// Visits one category: lists its detail links and extracts each
    async fn crawl_category(&mut self, category_url: &str, report: &mut RunReport) {
        let category = category_name(category_url);

        self.transition(RunPhase::DiscoveringLinks);
        let links = MovieLinkDiscovery::new(
            self.fetcher.as_ref(),
            self.dom.as_ref(),
            &self.base_url,
            &self.config.site.item_marker,
        )
        .discover(category_url)
        .await;

        let links = match links {
            Ok(links) => links,
            Err(e) => {
                tracing::error!("Failed to list category {}: {}", category_url, e);
                report.categories_failed += 1;
                return;
            }
        };
        report.categories_visited += 1;

        let selected = take_prefix(links, self.limits.max_movies_per_category);
        let total = selected.len();

        for (index, movie_url) in selected.iter().enumerate() {
            tracing::info!("  [{}/{}] Scraping {}", index + 1, total, movie_url);

            self.transition(RunPhase::ExtractingDetail);
            let extraction = {
                let extractor = MovieDetailExtractor::new(
                    self.fetcher.as_ref(),
                    self.dom.as_ref(),
                    &self.base_url,
                    &self.config.site,
                    &self.fields,
                    &self.pacing,
                );
                extractor.extract(movie_url, &category, &mut self.state).await
            };

            match extraction {
                Extraction::AlreadyProcessed => {
                    tracing::debug!("    Already processed {}", movie_url);
                    report.movies_skipped += 1;
                    continue;
                }
                Extraction::Abandoned => {
                    report.movies_failed += 1;
                }
                Extraction::Completed(movie) => {
                    self.transition(RunPhase::Accumulating);
                    tracing::info!("    {} ({} links)", movie.title, movie.links.len());

                    if self.state.record(movie) {
                        report.movies_extracted += 1;
                        self.maybe_checkpoint();
                    }
                }
            }

            self.pacing.after_movie().await;
        }
    }

    /// Writes the progress checkpoint when the movie count hits the interval
    fn maybe_checkpoint(&mut self) {
        let interval = self.config.output.checkpoint_interval.max(1);
        if self.state.movie_count() % interval != 0 {
            return;
        }

        self.transition(RunPhase::PeriodicCheckpoint);
        let progress_file = self.config.output.progress_file.clone();
        match self.save(&progress_file) {
            Ok(()) => tracing::info!(
                "Checkpoint saved: {} movies",
                self.state.movie_count()
            ),
            Err(e) => tracing::warn!("Failed to write checkpoint {}: {}", progress_file, e),
        }
    }

    /// Seeds state from the progress checkpoint, if one is usable
    ///
    /// A missing or malformed checkpoint means a fresh run.
    fn load_checkpoint(&mut self) {
        if self.fresh {
            tracing::info!("Starting fresh scrape (checkpoint ignored)");
            return;
        }

        let progress_file = &self.config.output.progress_file;
        let blob = match self.store.load(progress_file) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                tracing::info!("Starting fresh scrape");
                return;
            }
            Err(e) => {
                tracing::warn!("Could not read checkpoint {}: {}", progress_file, e);
                tracing::info!("Starting fresh scrape");
                return;
            }
        };

        match ScraperStats::from_json(&blob) {
            Ok(stats) => {
                self.state = CrawlState::from_snapshot(stats);
                tracing::info!(
                    "Resumed: {} movies already scraped",
                    self.state.movie_count()
                );
            }
            Err(e) => {
                tracing::warn!("Ignoring malformed checkpoint {}: {}", progress_file, e);
                tracing::info!("Starting fresh scrape");
            }
        }
    }

    /// Persists the current snapshot under `name`
    fn save(&self, name: &str) -> Result<(), CrawlerError> {
        let snapshot = self.state.snapshot();
        self.store.save(name, &snapshot.to_json()?)?;
        tracing::debug!("Saved {} movies to {}", snapshot.total_movies, name);
        Ok(())
    }

    fn transition(&mut self, phase: RunPhase) {
        if self.phase != phase {
            tracing::debug!("Run phase: {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }
}

/// Runs the main crawl operation
///
/// # Example
///
/// ```no_run
/// use catalog_crawler::config::Config;
/// use catalog_crawler::crawler::{run_crawl, RunLimits};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_crawl(Config::default(), RunLimits::new(Some(1), Some(5)), false).await?;
/// println!("{} movies", report.total_movies);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: Config,
    limits: RunLimits,
    fresh: bool,
) -> Result<RunReport, CrawlerError> {
    let mut coordinator = Coordinator::new(config)?.with_limits(limits).fresh(fresh);
    coordinator.run().await
}

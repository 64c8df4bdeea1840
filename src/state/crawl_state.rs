//! Crawl state: the deduplication set and the accumulated catalog
//!
//! Invariants, held after every mutation and after reload:
//! - every `movies[i].url` is in `processed_urls`
//! - no URL appears twice in `movies`

use crate::catalog::Movie;
use crate::output::ScraperStats;
use std::collections::HashSet;

/// Owned per-run crawl state
#[derive(Debug, Clone, Default)]
pub struct CrawlState {
    /// URLs that were claimed for extraction (successfully or not)
    processed_urls: HashSet<String>,

    /// Completed movies in completion order
    movies: Vec<Movie>,

    /// URLs present in `movies`
    recorded: HashSet<String>,
}

impl CrawlState {
    /// Creates an empty state for a fresh run
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a state from previously completed movies
    ///
    /// Every movie URL is marked processed. If the input lists a URL more
    /// than once, only its first record is kept.
    pub fn from_movies<I>(movies: I) -> Self
    where
        I: IntoIterator<Item = Movie>,
    {
        let mut state = Self::new();
        for movie in movies {
            state.mark_processed(&movie.url);
            state.record(movie);
        }
        state
    }

    /// Seeds a state from a saved checkpoint snapshot
    pub fn from_snapshot(stats: ScraperStats) -> Self {
        Self::from_movies(stats.movies)
    }

    /// Returns true if the URL was already claimed
    pub fn is_processed(&self, url: &str) -> bool {
        self.processed_urls.contains(url)
    }

    /// Claims a URL for extraction
    ///
    /// Returns false if it was already claimed.
    pub fn mark_processed(&mut self, url: &str) -> bool {
        self.processed_urls.insert(url.to_string())
    }

    /// Appends a completed movie
    ///
    /// The movie URL is marked processed if it was not already. Returns
    /// false (and leaves the state untouched) if a movie with the same URL
    /// is already recorded.
    pub fn record(&mut self, movie: Movie) -> bool {
        if !self.recorded.insert(movie.url.clone()) {
            return false;
        }
        self.processed_urls.insert(movie.url.clone());
        self.movies.push(movie);
        true
    }

    /// Completed movies in completion order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Number of completed movies
    pub fn movie_count(&self) -> usize {
        self.movies.len()
    }

    /// Number of claimed URLs
    pub fn processed_count(&self) -> usize {
        self.processed_urls.len()
    }

    /// Derives the persisted snapshot from the current movies
    pub fn snapshot(&self) -> ScraperStats {
        ScraperStats::from_movies(&self.movies)
    }
}

//! Catalog statistics snapshot
//!
//! `ScraperStats` is the persisted shape of both the progress checkpoint and
//! the completion file. Counts are recomputed from the movie list on every
//! save and never maintained incrementally.

use crate::catalog::Movie;
use crate::storage::CheckpointStore;
use crate::CrawlerError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Persisted crawl snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScraperStats {
    /// Number of movies in the catalog
    pub total_movies: usize,

    /// Number of distinct category names
    pub total_categories: usize,

    /// Number of download links across all movies
    pub total_links: usize,

    /// Distinct category names in first-seen order
    pub categories: Vec<String>,

    /// The catalog itself
    pub movies: Vec<Movie>,
}

impl ScraperStats {
    /// Derives a snapshot from a movie list
    pub fn from_movies(movies: &[Movie]) -> Self {
        let mut seen = HashSet::new();
        let mut categories = Vec::new();
        for movie in movies {
            if seen.insert(movie.category.as_str()) {
                categories.push(movie.category.clone());
            }
        }

        Self {
            total_movies: movies.len(),
            total_categories: categories.len(),
            total_links: movies.iter().map(|m| m.links.len()).sum(),
            categories,
            movies: movies.to_vec(),
        }
    }

    /// Number of links that resolved to a real download URL
    pub fn resolved_links(&self) -> usize {
        self.movies.iter().map(Movie::resolved_links).sum()
    }

    /// Serializes the snapshot as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, CrawlerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a snapshot from JSON
    pub fn from_json(json: &str) -> Result<Self, CrawlerError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Loads a saved snapshot from the store
///
/// # Returns
///
/// * `Ok(Some(ScraperStats))` - The artifact exists and parsed
/// * `Ok(None)` - No artifact with that name
/// * `Err(CrawlerError)` - The artifact could not be read or parsed
pub fn load_statistics(
    store: &dyn CheckpointStore,
    name: &str,
) -> Result<Option<ScraperStats>, CrawlerError> {
    match store.load(name)? {
        Some(blob) => Ok(Some(ScraperStats::from_json(&blob)?)),
        None => Ok(None),
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &ScraperStats) {
    println!("=== Catalog Statistics ===\n");

    println!("Overview:");
    println!("  Movies: {}", stats.total_movies);
    println!("  Categories: {}", stats.total_categories);
    println!("  Download links: {}", stats.total_links);
    println!();

    if !stats.categories.is_empty() {
        println!("Movies by Category:");
        for category in &stats.categories {
            let count = stats
                .movies
                .iter()
                .filter(|m| &m.category == category)
                .count();
            println!("  {}: {}", category, count);
        }
        println!();
    }

    let resolved = stats.resolved_links();
    let rate = if stats.total_links > 0 {
        (resolved as f64 / stats.total_links as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Resolution Rate: {:.1}% ({} / {} links resolved)",
        rate, resolved, stats.total_links
    );
}

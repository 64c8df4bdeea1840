//! Catalog records produced by the crawl
//!
//! - `Movie`: one item detail page and its download links
//! - `DownloadLink`: one download-server entry with its resolved target
//! - `ResolveOutcome`: the tagged result of following a server page

mod types;

pub use types::{DownloadLink, Movie, ResolveOutcome, ERROR_SENTINEL, NOT_FOUND_SENTINEL};

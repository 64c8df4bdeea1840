//! Output module for catalog snapshots
//!
//! This module handles:
//! - Deriving the persisted `ScraperStats` snapshot from crawl state
//! - Reading saved snapshots back
//! - Printing a console summary of a catalog

pub mod stats;

pub use stats::{load_statistics, print_statistics, ScraperStats};

//! State module for tracking crawl progress
//!
//! `CrawlState` owns the set of claimed URLs and the accumulated movie list.
//! It is created once per run, optionally seeded from a checkpoint, and
//! mutated only by the coordinator.

mod crawl_state;

pub use crawl_state::CrawlState;

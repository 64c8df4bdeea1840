//! URL handling module for Catalog-Crawler
//!
//! Relative-to-absolute link resolution, order-preserving deduplication
//! and category naming.

mod normalize;

pub use normalize::{absolutize, category_name, dedup_preserving_order, parse_base_url};

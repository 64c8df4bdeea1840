//! Storage module for persisting crawl artifacts
//!
//! This module handles checkpoint persistence for the crawler:
//! - The `CheckpointStore` trait: named JSON blobs under one namespace
//! - `FsCheckpointStore`: files under the output directory
//! - `MemoryCheckpointStore`: an in-process map

mod fs;
mod memory;
mod traits;

pub use fs::FsCheckpointStore;
pub use memory::MemoryCheckpointStore;
pub use traits::{CheckpointStore, StorageError, StorageResult};

use std::path::Path;

/// Opens the on-disk store for an output directory
pub fn open_storage(directory: &Path) -> FsCheckpointStore {
    FsCheckpointStore::new(directory)
}

//! Storage traits and error types
//!
//! This module defines the trait interface for checkpoint backends and
//! associated error types.

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on '{name}': {source}")]
    Io {
        name: String,
        source: std::io::Error,
    },

    #[error("Invalid artifact name: {0}")]
    InvalidName(String),

    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Named blob store for checkpoint and catalog artifacts
///
/// Names are bare file names such as `progress.json`; the backend decides
/// where they live.
pub trait CheckpointStore: Send + Sync {
    /// Loads an artifact
    ///
    /// # Returns
    ///
    /// * `Ok(Some(String))` - The stored blob
    /// * `Ok(None)` - Nothing stored under that name
    /// * `Err(StorageError)` - The backend failed to read
    fn load(&self, name: &str) -> StorageResult<Option<String>>;

    /// Stores an artifact, replacing any previous blob with that name
    fn save(&self, name: &str, blob: &str) -> StorageResult<()>;
}

/// Rejects names that would escape the backend's namespace
pub(crate) fn check_name(name: &str) -> StorageResult<()> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
    {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(())
}

use crate::storage::traits::{check_name, CheckpointStore, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory checkpoint store
#[derive(Debug, Default)]
pub struct MemoryCheckpointStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one artifact
    pub fn with_blob(name: &str, blob: &str) -> Self {
        let store = Self::new();
        if let Ok(mut blobs) = store.blobs.lock() {
            blobs.insert(name.to_string(), blob.to_string());
        }
        store
    }

    /// Names currently stored, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = match self.blobs.lock() {
            Ok(blobs) => blobs.keys().cloned().collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }
}

impl CheckpointStore for MemoryCheckpointStore {
    fn load(&self, name: &str) -> StorageResult<Option<String>> {
        check_name(name)?;
        let blobs = self
            .blobs
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(blobs.get(name).cloned())
    }

    fn save(&self, name: &str, blob: &str) -> StorageResult<()> {
        check_name(name)?;
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        blobs.insert(name.to_string(), blob.to_string());
        Ok(())
    }
}

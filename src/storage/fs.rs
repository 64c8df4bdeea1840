use crate::storage::traits::{check_name, CheckpointStore, StorageError, StorageResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Checkpoint store backed by a directory on disk
///
/// The directory is created on the first save. Writes go to a sibling
/// temp file that is then renamed over the target, so an interrupted save
/// leaves the previous artifact intact.
#[derive(Debug, Clone)]
pub struct FsCheckpointStore {
    directory: PathBuf,
}

impl FsCheckpointStore {
    /// Creates a store rooted at `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// The directory artifacts are written to
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Full path of a named artifact
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.directory.join(name)
    }

    fn io_error(name: &str, source: std::io::Error) -> StorageError {
        StorageError::Io {
            name: name.to_string(),
            source,
        }
    }
}

impl CheckpointStore for FsCheckpointStore {
    fn load(&self, name: &str) -> StorageResult<Option<String>> {
        check_name(name)?;

        match fs::read_to_string(self.path_for(name)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(name, e)),
        }
    }

    fn save(&self, name: &str, blob: &str) -> StorageResult<()> {
        check_name(name)?;

        fs::create_dir_all(&self.directory).map_err(|e| Self::io_error(name, e))?;

        let target = self.path_for(name);
        let temp = self.path_for(&format!(".{}.tmp", name));

        fs::write(&temp, blob).map_err(|e| Self::io_error(name, e))?;
        fs::rename(&temp, &target).map_err(|e| Self::io_error(name, e))?;

        tracing::debug!("Wrote {} bytes to {}", blob.len(), target.display());
        Ok(())
    }
}

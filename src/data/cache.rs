use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::error::DataError;
use super::loader::load_file;
use super::model::Dataset;

/// What we compare to decide whether a file changed since it was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSignature {
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl FileSignature {
    pub fn of(path: &Path) -> Result<Self, DataError> {
        let meta = std::fs::metadata(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                DataError::SourceNotFound(path.to_path_buf())
            } else {
                DataError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Ok(FileSignature {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

#[derive(Debug)]
struct CacheEntry {
    signature: FileSignature,
    dataset: Arc<Dataset>,
}

/// Loaded datasets keyed by source path.
///
/// An entry is reused only while the file's [`FileSignature`] is unchanged.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `path`, (re)loading it if the file is
    /// new to the cache or has changed on disk.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Dataset>, DataError> {
        let signature = FileSignature::of(path)?;

        if let Some(entry) = self.entries.get(path) {
            if entry.signature == signature {
                log::debug!("cache hit for {}", path.display());
                return Ok(Arc::clone(&entry.dataset));
            }
            log::info!("{} changed on disk, reloading", path.display());
        }

        let dataset = Arc::new(load_file(path)?);
        self.entries.insert(
            path.to_path_buf(),
            CacheEntry {
                signature,
                dataset: Arc::clone(&dataset),
            },
        );
        Ok(dataset)
    }

    /// Drop the entry for `path`. Returns whether one existed.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

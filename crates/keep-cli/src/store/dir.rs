//! Local-directory blob store.
//!
//! Each object is one file under the root directory; `/` in object keys
//! maps to subdirectories. Useful for offline vaults and for exercising the
//! CLI without network access.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use keep_core::{BlobStore, StoreError};

pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map an object key to a path under the root, refusing anything that
    /// would escape it.
    fn object_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(key);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if key.is_empty() || !safe {
            return Err(StoreError::Unavailable(format!(
                "invalid object key: {}",
                key
            )));
        }
        Ok(self.root.join(relative))
    }
}

impl BlobStore for DirStore {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.object_path(key)?;
        fs::read(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StoreError::NotFound
            } else {
                StoreError::Unavailable(format!("failed to read {}: {}", path.display(), e))
            }
        })
    }

    fn put(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let path = self.object_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::Unavailable(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }
        fs::write(&path, data).map_err(|e| {
            StoreError::Unavailable(format!("failed to write {}: {}", path.display(), e))
        })
    }
}

//! Blob store trait and in-memory implementation.
//!
//! The vault treats its backing store as a plain key-value byte store. The
//! only contract beyond get/put is that a missing object is reported as
//! [`StoreError::NotFound`], distinguishable from transport failures: the
//! vault relies on that distinction to bootstrap an empty access database
//! on first use.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

/// Errors reported by a blob store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No object under the requested key.
    #[error("object not found")]
    NotFound,

    /// Any other I/O or transport failure.
    #[error("{0}")]
    Unavailable(String),
}

/// A key-value byte store.
pub trait BlobStore {
    /// Fetch the object stored under `key`.
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Store `data` under `key`, overwriting any previous object.
    fn put(&self, key: &str, data: &[u8]) -> Result<(), StoreError>;
}

impl<S: BlobStore + ?Sized> BlobStore for Box<S> {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        (**self).put(key, data)
    }
}

impl<S: BlobStore + ?Sized> BlobStore for &S {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        (**self).put(key, data)
    }
}

/// An in-process blob store backed by a hash map.
///
/// Used by tests and useful for embedding; objects live only as long as the
/// store value itself.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let objects = self
            .objects
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        objects.get(key).cloned().ok_or(StoreError::NotFound)
    }

    fn put(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let mut objects = self
            .objects
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        objects.insert(key.to_string(), data.to_vec());
        Ok(())
    }
}

//! Key-value blob storage.
//!
//! The task list lives in a single string value under a fixed key. The
//! store only needs get/set; what sits behind them is up to the backend.

use super::files::{atomic_write, ensure_dir, read_file};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Opaque get/set string storage keyed by name
pub trait BlobStore {
    /// Read the value for `key`, None if nothing was ever written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value for `key`
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        read_file(self.path_for(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        ensure_dir(&self.dir)?;
        atomic_write(self.path_for(key), value)
    }
}

/// In-memory store for tests
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    values: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value directly (e.g. a corrupt blob)
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value.to_string());
        store
    }
}

#[cfg(test)]
impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

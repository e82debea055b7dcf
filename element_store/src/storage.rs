// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

/// Interface onto the blob storage holding uploaded images and font files.
///
/// The element store never reads file contents, it only asks if a referenced file is present
/// before persisting a reference to it.
#[async_trait]
pub trait StorageService: Debug + Send + Sync {
    /// Returns `true` when a file is stored under this path.
    async fn file_exists(&self, path: &str) -> Result<bool>;
}

/// Storage service keeping a set of known file paths in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<HashSet<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a file under the given path.
    pub fn insert(&self, path: &str) -> Result<()> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| anyhow!("Storage file index is poisoned"))?;
        files.insert(path.to_owned());
        Ok(())
    }

    /// Forgets the file stored under the given path, returns `true` if it was known.
    pub fn remove(&self, path: &str) -> Result<bool> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| anyhow!("Storage file index is poisoned"))?;
        Ok(files.remove(path))
    }
}

#[async_trait]
impl StorageService for MemoryStorage {
    async fn file_exists(&self, path: &str) -> Result<bool> {
        let files = self
            .files
            .lock()
            .map_err(|_| anyhow!("Storage file index is poisoned"))?;
        Ok(files.contains(path))
    }
}

use std::{
    fs,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tracing::debug;

use crate::{
    config::Config,
    core::utils::{ensure_dir, write_file_atomic, PathResolver},
    errors::StorageError,
};

use super::{PersistenceAdapter, Result};

const BLOB_EXTENSION: &str = "json";

/// Stores each collection as `<key>.json` under a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    /// Opens the store in the configured data directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        let root = config
            .data_dir
            .clone()
            .unwrap_or_else(|| PathResolver::data_dir_in(&PathResolver::resolve_base(None)));
        Self::new(root)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn blob_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_key(key), BLOB_EXTENSION))
    }
}

#[async_trait]
impl PersistenceAdapter for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.blob_path(key);
        debug!(key, path = %path.display(), "reading collection");
        run_blocking(move || read_blob(&path)).await
    }

    async fn set(&self, key: &str, blob: &str) -> Result<()> {
        let path = self.blob_path(key);
        let data = blob.to_string();
        debug!(key, path = %path.display(), bytes = data.len(), "writing collection");
        run_blocking(move || save_blob_to_path(&path, &data)).await
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| StorageError::Backend(format!("storage task failed: {}", err)))?
}

fn read_blob(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    Ok(Some(fs::read_to_string(path)?))
}

/// Writes `data` next to `path` and renames it into place.
pub fn save_blob_to_path(path: &Path, data: &str) -> Result<()> {
    write_file_atomic(path, data)?;
    Ok(())
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "collection".into()
    } else {
        sanitized
    }
}

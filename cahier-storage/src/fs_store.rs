//! Filesystem-backed blob store.
//!
//! Stores each object as a file under a root directory, with metadata in
//! a JSON sidecar next to it. Key segments separated by `/` become
//! directories, so the `reports/` namespace maps onto a real folder and
//! can be inspected with ordinary tools.

use crate::blob::BlobStore;
use async_trait::async_trait;
use cahier_core::{CahierResult, StorageError, StoredMetadata};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Sidecar suffix for metadata documents.
const META_SUFFIX: &str = ".meta.json";

/// Blob store persisting objects under a local directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Create a store rooted at `root`. The directory is created on
    /// first write, not here.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory objects live under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn data_path(&self, key: &str) -> CahierResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    fn meta_path(&self, key: &str) -> CahierResult<PathBuf> {
        Ok(self.root.join(format!("{key}{META_SUFFIX}")))
    }

    fn key_for(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<&str> = rel.iter().filter_map(|c| c.to_str()).collect();
        Some(parts.join("/"))
    }
}

/// Keys must stay inside the root directory.
fn validate_key(key: &str) -> CahierResult<()> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.split('/').any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if bad {
        return Err(StorageError::WriteFailed {
            key: key.to_string(),
            reason: "invalid storage key".to_string(),
        }
        .into());
    }
    Ok(())
}

fn read_failed(key: &str, e: std::io::Error) -> cahier_core::CahierError {
    StorageError::ReadFailed {
        key: key.to_string(),
        reason: e.to_string(),
    }
    .into()
}

fn write_failed(key: &str, e: std::io::Error) -> cahier_core::CahierError {
    StorageError::WriteFailed {
        key: key.to_string(),
        reason: e.to_string(),
    }
    .into()
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, key: &str, bytes: &[u8], metadata: StoredMetadata) -> CahierResult<()> {
        let data_path = self.data_path(key)?;
        if let Some(parent) = data_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| write_failed(key, e))?;
        }

        tokio::fs::write(&data_path, bytes)
            .await
            .map_err(|e| write_failed(key, e))?;

        let meta_json = serde_json::to_vec(&metadata).map_err(|e| StorageError::WriteFailed {
            key: key.to_string(),
            reason: format!("metadata encode: {e}"),
        })?;
        tokio::fs::write(self.meta_path(key)?, meta_json)
            .await
            .map_err(|e| write_failed(key, e))?;

        Ok(())
    }

    async fn get(&self, key: &str) -> CahierResult<Option<Vec<u8>>> {
        match tokio::fs::read(self.data_path(key)?).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(read_failed(key, e)),
        }
    }

    async fn head(&self, key: &str) -> CahierResult<Option<StoredMetadata>> {
        validate_key(key)?;
        match tokio::fs::read(self.meta_path(key)?).await {
            Ok(bytes) => {
                let metadata =
                    serde_json::from_slice(&bytes).map_err(|e| StorageError::ReadFailed {
                        key: key.to_string(),
                        reason: format!("metadata decode: {e}"),
                    })?;
                Ok(Some(metadata))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(read_failed(key, e)),
        }
    }

    async fn delete(&self, key: &str) -> CahierResult<()> {
        for path in [self.data_path(key)?, self.meta_path(key)?] {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(write_failed(key, e)),
            }
        }
        Ok(())
    }

    async fn list(&self, prefix: &str) -> CahierResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                // Root (or a raced-away subdirectory) not existing means
                // there is nothing to list.
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(StorageError::ListFailed {
                        prefix: prefix.to_string(),
                        reason: e.to_string(),
                    }
                    .into())
                }
            };

            loop {
                let entry = entries.next_entry().await.map_err(|e| StorageError::ListFailed {
                    prefix: prefix.to_string(),
                    reason: e.to_string(),
                })?;
                let Some(entry) = entry else { break };

                let file_type = entry.file_type().await.map_err(|e| StorageError::ListFailed {
                    prefix: prefix.to_string(),
                    reason: e.to_string(),
                })?;
                let path = entry.path();
                if file_type.is_dir() {
                    pending.push(path);
                    continue;
                }
                let Some(key) = self.key_for(&path) else { continue };
                if key.ends_with(META_SUFFIX) {
                    continue;
                }
                if key.starts_with(prefix) {
                    keys.push(key);
                }
            }
        }

        keys.sort();
        Ok(keys)
    }
}

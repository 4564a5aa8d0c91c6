//! Prefix-namespacing storage service for report artifacts.
//!
//! [`ReportStore`] is a thin wrapper over a [`BlobStore`]: it prepends
//! the configured namespace prefix to every key, stamps freshly computed
//! metadata on writes, and offers a best-effort batched delete. All
//! actual persistence belongs to the backend.

use crate::blob::BlobStore;
use cahier_core::{compute_content_hash, CacheConfig, CahierResult, StoredMetadata};
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage service for report artifacts.
#[derive(Debug)]
pub struct ReportStore<S: BlobStore> {
    blobs: Arc<S>,
    prefix: String,
    version: String,
}

impl<S: BlobStore> ReportStore<S> {
    pub fn new(blobs: Arc<S>, config: &CacheConfig) -> Self {
        Self {
            blobs,
            prefix: config.prefix.clone(),
            version: config.format_version.clone(),
        }
    }

    /// The namespace prefix this store writes under.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Write report bytes under `key`, stamping content type, generation
    /// timestamp, format version, and a SHA-256 integrity hash.
    pub async fn put(&self, key: &str, bytes: &[u8]) -> CahierResult<()> {
        let metadata = StoredMetadata::new(&self.version, compute_content_hash(bytes));
        debug!(key, size = bytes.len(), "storing report artifact");
        self.blobs.put(&self.namespaced(key), bytes, metadata).await
    }

    /// Read report bytes. Absent keys are `Ok(None)`.
    pub async fn get(&self, key: &str) -> CahierResult<Option<Vec<u8>>> {
        self.blobs.get(&self.namespaced(key)).await
    }

    /// Metadata-only read, for cheap freshness checks.
    pub async fn get_metadata(&self, key: &str) -> CahierResult<Option<StoredMetadata>> {
        self.blobs.head(&self.namespaced(key)).await
    }

    /// Whether an artifact exists under `key`.
    pub async fn exists(&self, key: &str) -> CahierResult<bool> {
        Ok(self.get_metadata(key).await?.is_some())
    }

    /// Delete the artifact under `key`.
    pub async fn delete(&self, key: &str) -> CahierResult<()> {
        self.blobs.delete(&self.namespaced(key)).await
    }

    /// List keys under this store's namespace starting with `prefix`,
    /// with the namespace stripped off.
    pub async fn list(&self, prefix: &str) -> CahierResult<Vec<String>> {
        let keys = self.blobs.list(&self.namespaced(prefix)).await?;
        Ok(keys
            .into_iter()
            .filter_map(|k| k.strip_prefix(&self.prefix).map(str::to_string))
            .collect())
    }

    /// Delete many artifacts concurrently, best-effort.
    ///
    /// Individual failures are logged and skipped rather than failing
    /// the batch: a leftover entry is stale-but-harmless and will be
    /// evicted by the next TTL check. Returns the number deleted.
    pub async fn delete_many(&self, keys: &[String]) -> u64 {
        let deletes = keys.iter().map(|key| {
            let namespaced = self.namespaced(key);
            let blobs = Arc::clone(&self.blobs);
            async move { (namespaced.clone(), blobs.delete(&namespaced).await) }
        });

        let mut deleted = 0;
        for (key, result) in join_all(deletes).await {
            match result {
                Ok(()) => deleted += 1,
                Err(e) => warn!(key, error = %e, "best-effort delete failed"),
            }
        }
        deleted
    }
}

impl<S: BlobStore> Clone for ReportStore<S> {
    fn clone(&self) -> Self {
        Self {
            blobs: Arc::clone(&self.blobs),
            prefix: self.prefix.clone(),
            version: self.version.clone(),
        }
    }
}

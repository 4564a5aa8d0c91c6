//! Blob store abstraction and the in-memory backend.
//!
//! [`BlobStore`] is the collaborator contract the rest of the subsystem
//! is written against: whole-object puts and gets plus a metadata-only
//! head, a prefix list, and an idempotent delete. Real deployments plug
//! in an object-storage bucket; tests and single-process deployments use
//! [`MemoryBlobStore`].

use async_trait::async_trait;
use cahier_core::{CahierResult, StorageError, StoredMetadata};
use std::collections::HashMap;
use std::sync::RwLock;

/// Key-value object store for report artifacts.
///
/// Implementations must be thread-safe. "Not found" is `Ok(None)` for
/// reads and a no-op for deletes; only genuine backend failures are
/// errors.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write an object, replacing any existing object under `key`.
    async fn put(&self, key: &str, bytes: &[u8], metadata: StoredMetadata) -> CahierResult<()>;

    /// Read an object's bytes.
    async fn get(&self, key: &str) -> CahierResult<Option<Vec<u8>>>;

    /// Read an object's metadata without transferring its content.
    async fn head(&self, key: &str) -> CahierResult<Option<StoredMetadata>>;

    /// Delete an object. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> CahierResult<()>;

    /// List every key starting with `prefix`, sorted.
    async fn list(&self, prefix: &str) -> CahierResult<Vec<String>>;
}

/// In-memory blob store.
///
/// The reference backend: every cache test runs against it, and it is a
/// reasonable production choice for single-process deployments where
/// reports can be regenerated after a restart.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: RwLock<HashMap<String, (Vec<u8>, StoredMetadata)>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_guard(
        &self,
    ) -> CahierResult<std::sync::RwLockReadGuard<'_, HashMap<String, (Vec<u8>, StoredMetadata)>>>
    {
        self.objects.read().map_err(|_| {
            StorageError::Backend {
                reason: "lock poisoned".to_string(),
            }
            .into()
        })
    }

    fn write_guard(
        &self,
    ) -> CahierResult<std::sync::RwLockWriteGuard<'_, HashMap<String, (Vec<u8>, StoredMetadata)>>>
    {
        self.objects.write().map_err(|_| {
            StorageError::Backend {
                reason: "lock poisoned".to_string(),
            }
            .into()
        })
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, bytes: &[u8], metadata: StoredMetadata) -> CahierResult<()> {
        self.write_guard()?
            .insert(key.to_string(), (bytes.to_vec(), metadata));
        Ok(())
    }

    async fn get(&self, key: &str) -> CahierResult<Option<Vec<u8>>> {
        Ok(self.read_guard()?.get(key).map(|(bytes, _)| bytes.clone()))
    }

    async fn head(&self, key: &str) -> CahierResult<Option<StoredMetadata>> {
        Ok(self.read_guard()?.get(key).map(|(_, meta)| meta.clone()))
    }

    async fn delete(&self, key: &str) -> CahierResult<()> {
        self.write_guard()?.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> CahierResult<Vec<String>> {
        let mut keys: Vec<String> = self
            .read_guard()?
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> StoredMetadata {
        StoredMetadata::new("1.0", "hash")
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = MemoryBlobStore::new();
        store.put("reports/a", b"pdf-bytes", meta()).await.unwrap();

        let bytes = store.get("reports/a").await.unwrap();
        assert_eq!(bytes, Some(b"pdf-bytes".to_vec()));
    }

    #[tokio::test]
    async fn test_get_absent_returns_none() {
        let store = MemoryBlobStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);
        assert_eq!(store.head("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_head_returns_metadata_only() {
        let store = MemoryBlobStore::new();
        let metadata = meta();
        store.put("k", b"content", metadata.clone()).await.unwrap();

        let head = store.head("k").await.unwrap().unwrap();
        assert_eq!(head, metadata);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemoryBlobStore::new();
        store.put("k", b"one", meta()).await.unwrap();
        store.put("k", b"two", meta()).await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some(b"two".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryBlobStore::new();
        store.put("k", b"x", meta()).await.unwrap();

        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);

        // Second delete of the same key is still Ok.
        store.delete("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_filters_by_prefix_and_sorts() {
        let store = MemoryBlobStore::new();
        store.put("reports/b", b"1", meta()).await.unwrap();
        store.put("reports/a", b"2", meta()).await.unwrap();
        store.put("other/c", b"3", meta()).await.unwrap();

        let keys = store.list("reports/").await.unwrap();
        assert_eq!(keys, vec!["reports/a".to_string(), "reports/b".to_string()]);

        let all = store.list("").await.unwrap();
        assert_eq!(all.len(), 3);
    }
}

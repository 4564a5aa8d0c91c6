//! The report cache manager.

use crate::blob::BlobStore;
use crate::cache::read::{CacheReadOptions, CachedReport};
use crate::report_store::ReportStore;
use cahier_core::{CacheConfig, CahierResult, ReportKey, ReportKind};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Counts of cached artifacts by report family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total_cached: u64,
    pub semester_reports: u64,
    pub student_reports: u64,
}

/// Cache manager for report artifacts.
///
/// Owns the storage service and applies the staleness and invalidation
/// policy described in the [module docs](crate::cache).
#[derive(Debug)]
pub struct ReportCache<S: BlobStore> {
    store: ReportStore<S>,
    config: CacheConfig,
}

impl<S: BlobStore> ReportCache<S> {
    pub fn new(blobs: Arc<S>, config: CacheConfig) -> Self {
        let store = ReportStore::new(blobs, &config);
        Self { store, config }
    }

    /// Create a cache with the default configuration.
    pub fn with_defaults(blobs: Arc<S>) -> Self {
        Self::new(blobs, CacheConfig::default())
    }

    /// The underlying storage service.
    pub fn store(&self) -> &ReportStore<S> {
        &self.store
    }

    /// The cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Look up a cached report.
    ///
    /// Returns `Ok(None)` on bypass (`force_refresh`), on a missing
    /// entry, and on a stale entry, which is deleted on the way out
    /// (lazy eviction, no background sweep). Storage failures propagate;
    /// they are never reported as misses.
    pub async fn get(
        &self,
        key: &ReportKey,
        options: &CacheReadOptions,
    ) -> CahierResult<Option<CachedReport>> {
        let storage_key = key.storage_key();

        if options.force_refresh {
            debug!(key = %storage_key, "cache bypass requested");
            return Ok(None);
        }

        let Some(metadata) = self.store.get_metadata(&storage_key).await? else {
            debug!(key = %storage_key, "cache miss");
            return Ok(None);
        };

        let ttl = options.ttl.unwrap_or(self.config.default_ttl);
        if !ttl.is_zero() {
            let age = Utc::now()
                .signed_duration_since(metadata.generated_at)
                .to_std()
                .unwrap_or(Duration::ZERO);
            if age > ttl {
                debug!(key = %storage_key, age_secs = age.as_secs(), "stale entry, evicting");
                self.store.delete(&storage_key).await?;
                return Ok(None);
            }
        }

        let Some(content) = self.store.get(&storage_key).await? else {
            // Entry vanished between head and get; treat as a plain miss.
            return Ok(None);
        };

        debug!(key = %storage_key, size = content.len(), "cache hit");
        Ok(Some(CachedReport {
            content,
            generated_at: metadata.generated_at,
            cache_key: storage_key,
        }))
    }

    /// Store freshly generated report bytes under `key`.
    pub async fn set(&self, key: &ReportKey, bytes: &[u8]) -> CahierResult<()> {
        self.store.put(&key.storage_key(), bytes).await
    }

    /// Delete the exact entry for `key`.
    pub async fn invalidate(&self, key: &ReportKey) -> CahierResult<()> {
        self.store.delete(&key.storage_key()).await
    }

    /// Delete every entry belonging to one semester of one academic
    /// year. Returns the number of entries deleted.
    pub async fn invalidate_semester(
        &self,
        semester: &str,
        academic_year: &str,
    ) -> CahierResult<u64> {
        self.invalidate_prefix(&ReportKey::semester_prefix(semester, academic_year))
            .await
    }

    /// Delete every entry belonging to one student. Returns the number
    /// of entries deleted.
    pub async fn invalidate_student(&self, student_id: &str) -> CahierResult<u64> {
        self.invalidate_prefix(&ReportKey::student_prefix(student_id))
            .await
    }

    /// Delete every cached report. Administrative use only.
    pub async fn invalidate_all(&self) -> CahierResult<u64> {
        let keys = self.store.list("").await?;
        Ok(self.store.delete_many(&keys).await)
    }

    /// Counts of cached artifacts by report family.
    pub async fn stats(&self) -> CahierResult<CacheStats> {
        let keys = self.store.list("").await?;
        let semester_prefix = ReportKey::kind_prefix(ReportKind::Semester);
        let student_prefix = ReportKey::kind_prefix(ReportKind::Student);

        let semester_reports = keys.iter().filter(|k| k.starts_with(&semester_prefix)).count() as u64;
        let student_reports = keys.iter().filter(|k| k.starts_with(&student_prefix)).count() as u64;

        Ok(CacheStats {
            total_cached: keys.len() as u64,
            semester_reports,
            student_reports,
        })
    }

    /// List-and-delete for one key-family prefix.
    ///
    /// The listing over-approximates (plain `starts_with` at the storage
    /// layer), then [`ReportKey::matches_prefix`] trims matches to field
    /// boundaries so `student_S1` never claims `student_S12`'s entries.
    async fn invalidate_prefix(&self, prefix: &str) -> CahierResult<u64> {
        let keys = self.store.list(prefix).await?;
        let matching: Vec<String> = keys
            .into_iter()
            .filter(|k| ReportKey::matches_prefix(k, prefix))
            .collect();
        debug!(prefix, count = matching.len(), "invalidating by prefix");
        Ok(self.store.delete_many(&matching).await)
    }
}

impl<S: BlobStore> Clone for ReportCache<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
        }
    }
}

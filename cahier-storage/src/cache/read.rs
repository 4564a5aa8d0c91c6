//! Cache read options and the returned artifact view.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Options for one cache read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheReadOptions {
    /// Staleness budget. `None` uses the cache's configured default;
    /// `Duration::ZERO` means the entry never goes stale.
    pub ttl: Option<Duration>,
    /// Bypass the cache entirely: the read reports a miss without
    /// touching storage, forcing the caller down the regeneration path.
    pub force_refresh: bool,
}

impl CacheReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an explicit TTL for this read.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Request a cache bypass.
    pub fn force_refresh(mut self) -> Self {
        self.force_refresh = true;
        self
    }
}

/// A fresh cached report returned from a cache hit.
///
/// Only fresh entries are ever returned: stale entries are evicted and
/// reported as misses, so unlike a dynamic-language rendition there is
/// no `is_stale` flag to check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedReport {
    /// The stored PDF bytes.
    pub content: Vec<u8>,
    /// When the artifact was generated.
    pub generated_at: DateTime<Utc>,
    /// The storage key string the artifact lives under.
    pub cache_key: String,
}

impl CachedReport {
    /// Size of the cached content in bytes.
    pub fn size_bytes(&self) -> usize {
        self.content.len()
    }

    /// Age of the artifact at `now`.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.generated_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_options_builder() {
        let opts = CacheReadOptions::new()
            .with_ttl(Duration::from_secs(60))
            .force_refresh();
        assert_eq!(opts.ttl, Some(Duration::from_secs(60)));
        assert!(opts.force_refresh);
    }

    #[test]
    fn test_read_options_default() {
        let opts = CacheReadOptions::default();
        assert_eq!(opts.ttl, None);
        assert!(!opts.force_refresh);
    }

    #[test]
    fn test_cached_report_age() {
        let report = CachedReport {
            content: vec![1, 2, 3],
            generated_at: Utc::now() - chrono::Duration::seconds(30),
            cache_key: "student_abc".to_string(),
        };
        assert_eq!(report.size_bytes(), 3);

        let age = report.age(Utc::now());
        assert!(age >= Duration::from_secs(29));
        assert!(age <= Duration::from_secs(60));
    }

    #[test]
    fn test_cached_report_age_clamps_future_timestamps() {
        let report = CachedReport {
            content: vec![],
            generated_at: Utc::now() + chrono::Duration::seconds(30),
            cache_key: "k".to_string(),
        };
        assert_eq!(report.age(Utc::now()), Duration::ZERO);
    }
}

//! End-to-end behavior of the report pipeline: cache round trips, TTL
//! expiry, invalidation scoping, concurrent regeneration, and timeout
//! bounds.

use cahier_core::{fingerprint, ReportKey, StoredMetadata};
use cahier_reports::{GenerateReportOptions, ReportService};
use cahier_storage::{BlobStore, CacheReadOptions, MemoryBlobStore, ReportCache};
use cahier_test_utils::{
    pdf_bytes, sample_biodata, sample_student_summary, NeverRenderer, SlowRenderer, StaticRenderer,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_cache_round_trip_returns_identical_bytes() {
    let content = pdf_bytes(200_000);
    let service = ReportService::with_defaults(
        Arc::new(MemoryBlobStore::new()),
        Arc::new(StaticRenderer::new(content.clone())),
    );
    let key = ReportKey::student("abc");
    let payload = sample_student_summary("abc");

    let generated = service
        .generate_report(&payload, &key, &GenerateReportOptions::new())
        .await
        .unwrap();
    assert!(!generated.from_cache);

    let cached = service
        .generate_report(
            &payload,
            &key,
            &GenerateReportOptions::new().with_ttl(Duration::from_secs(3600)),
        )
        .await
        .unwrap();

    assert!(cached.from_cache);
    assert_eq!(cached.content, content);
    assert_eq!(cached.size_bytes, content.len());
}

#[tokio::test]
async fn test_ttl_expiry_deletes_underlying_entry() {
    let blobs = Arc::new(MemoryBlobStore::new());
    let cache = ReportCache::with_defaults(Arc::clone(&blobs));
    let key = ReportKey::student("abc");

    cache.set(&key, &pdf_bytes(64)).await.unwrap();

    // Age the stored entry beyond the TTL about to be used.
    let mut metadata: StoredMetadata = blobs.head("reports/student_abc").await.unwrap().unwrap();
    metadata.generated_at = Utc::now() - chrono::Duration::seconds(120);
    blobs
        .put("reports/student_abc", &pdf_bytes(64), metadata)
        .await
        .unwrap();

    let read = cache
        .get(&key, &CacheReadOptions::new().with_ttl(Duration::from_secs(60)))
        .await
        .unwrap();
    assert!(read.is_none());

    // Lazy eviction removed the artifact itself, not just the view.
    assert!(!cache.store().exists("student_abc").await.unwrap());
}

#[tokio::test]
async fn test_invalidate_student_then_miss() {
    let blobs = Arc::new(MemoryBlobStore::new());
    let cache = ReportCache::with_defaults(blobs);
    let key = ReportKey::student("abc");
    let bytes = pdf_bytes(128);

    cache.set(&key, &bytes).await.unwrap();
    let hit = cache
        .get(&key, &CacheReadOptions::new().with_ttl(Duration::from_secs(3600)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(hit.content, bytes);

    let deleted = cache.invalidate_student("abc").await.unwrap();
    assert_eq!(deleted, 1);

    let read = cache
        .get(&key, &CacheReadOptions::new().with_ttl(Duration::from_secs(3600)))
        .await
        .unwrap();
    assert!(read.is_none());
}

#[tokio::test]
async fn test_concurrent_generation_same_key_is_safe() {
    // No per-key locking exists: both requests miss, both render, and
    // the last writer wins. The point pinned here is that the duplicate
    // work is wasted but never corrupting.
    let renderer = Arc::new(SlowRenderer::new(
        pdf_bytes(512),
        Duration::from_millis(50),
    ));
    let service = ReportService::with_defaults(
        Arc::new(MemoryBlobStore::new()),
        Arc::clone(&renderer),
    );
    let key = ReportKey::student("abc");
    let payload = sample_biodata("abc");
    let options = GenerateReportOptions::new();

    let (a, b) = tokio::join!(
        service.generate_report(&payload, &key, &options),
        service.generate_report(&payload, &key, &options),
    );
    let a = a.unwrap();
    let b = b.unwrap();

    assert!(!a.from_cache);
    assert!(!b.from_cache);
    assert_eq!(renderer.renders(), 2);
    assert_eq!(a.content, b.content);

    // The cache holds one valid artifact afterwards.
    let cached = service
        .cache()
        .get(&key, &CacheReadOptions::new().with_ttl(Duration::from_secs(3600)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cached.content, pdf_bytes(512));
    assert!(cached.content.starts_with(b"%PDF"));
    assert_eq!(service.cache_stats().await.unwrap().total_cached, 1);
}

#[tokio::test]
async fn test_data_hash_separates_entries_until_student_invalidation() {
    // Keys carrying a data fingerprint miss when the underlying records
    // change, without any explicit invalidation call; per-student
    // invalidation still sweeps every variant away.
    let cache = ReportCache::with_defaults(Arc::new(MemoryBlobStore::new()));

    let old_payload = sample_biodata("abc");
    let new_payload = sample_student_summary("abc");
    let old_key = ReportKey::student("abc").with_data_hash(fingerprint(&old_payload).unwrap());
    let new_key = ReportKey::student("abc").with_data_hash(fingerprint(&new_payload).unwrap());
    assert_ne!(old_key.storage_key(), new_key.storage_key());

    cache.set(&old_key, &pdf_bytes(32)).await.unwrap();

    // The changed data's key is a miss even though the stale artifact
    // is still cached.
    let ttl = CacheReadOptions::new().with_ttl(Duration::from_secs(3600));
    assert!(cache.get(&new_key, &ttl).await.unwrap().is_none());
    assert!(cache.get(&old_key, &ttl).await.unwrap().is_some());

    cache.set(&new_key, &pdf_bytes(48)).await.unwrap();
    assert_eq!(cache.invalidate_student("abc").await.unwrap(), 2);
    assert_eq!(cache.stats().await.unwrap().total_cached, 0);
}

#[tokio::test]
async fn test_timeout_fires_within_budget() {
    let service = ReportService::with_defaults(
        Arc::new(MemoryBlobStore::new()),
        Arc::new(NeverRenderer),
    );
    let key = ReportKey::student("abc");
    let options = GenerateReportOptions::new().with_timeout(Duration::from_millis(100));

    let start = std::time::Instant::now();
    let result = service
        .generate_report(&sample_biodata("abc"), &key, &options)
        .await;
    let elapsed = start.elapsed();

    assert!(result.unwrap_err().is_timeout());
    assert!(elapsed >= Duration::from_millis(100));
    assert!(elapsed < Duration::from_secs(5));

    // A timed-out generation caches nothing.
    assert_eq!(service.cache_stats().await.unwrap().total_cached, 0);
}

//! The report orchestration service.

use async_stream::try_stream;
use cahier_core::{CahierResult, ReportKey, ReportPayload, ReportResult};
use cahier_render::{chunk_bytes, GenerateOptions, Generator, ProgressCallback, Renderer};
use cahier_storage::{BlobStore, CacheReadOptions, CacheStats, ReportCache};
use chrono::Utc;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Options for one orchestrated report request.
#[derive(Clone, Default)]
pub struct GenerateReportOptions {
    /// Bypass the cache entirely: no read before generation and no
    /// write after it. The cache is left untouched.
    pub skip_cache: bool,
    /// Regenerate even if a fresh entry exists, then overwrite it.
    pub force_refresh: bool,
    /// Staleness budget for the cache read. `None` uses the cache's
    /// configured default; zero means never stale.
    pub ttl: Option<Duration>,
    /// Per-call generation timeout override.
    pub timeout: Option<Duration>,
    /// Progress callback forwarded to the generator.
    pub on_progress: Option<ProgressCallback>,
}

impl GenerateReportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip_cache(mut self) -> Self {
        self.skip_cache = true;
        self
    }

    pub fn force_refresh(mut self) -> Self {
        self.force_refresh = true;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    fn cache_read_options(&self) -> CacheReadOptions {
        CacheReadOptions {
            ttl: self.ttl,
            force_refresh: self.force_refresh,
        }
    }

    fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            timeout: self.timeout,
            on_progress: self.on_progress.clone(),
        }
    }
}

impl std::fmt::Debug for GenerateReportOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateReportOptions")
            .field("skip_cache", &self.skip_cache)
            .field("force_refresh", &self.force_refresh)
            .field("ttl", &self.ttl)
            .field("timeout", &self.timeout)
            .field("on_progress", &self.on_progress.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

/// Cache-first report façade.
///
/// Holds no per-request state and no per-key locks: concurrent requests
/// for the same missing key each regenerate independently and the last
/// write wins. Every writer derives the same key and stores equivalent
/// bytes, so the duplicate work is wasted but never corrupting. Callers
/// needing dedup must bring their own single-flight mechanism.
pub struct ReportService<S: BlobStore, R: Renderer> {
    cache: ReportCache<S>,
    generator: Generator<R>,
}

impl<S: BlobStore, R: Renderer> ReportService<S, R> {
    pub fn new(cache: ReportCache<S>, generator: Generator<R>) -> Self {
        Self { cache, generator }
    }

    /// Wire a service from a blob store and a renderer with default
    /// cache and generator configuration.
    pub fn with_defaults(blobs: Arc<S>, renderer: Arc<R>) -> Self {
        Self::new(
            ReportCache::with_defaults(blobs),
            Generator::with_defaults(renderer),
        )
    }

    /// The cache layer.
    pub fn cache(&self) -> &ReportCache<S> {
        &self.cache
    }

    /// The generator.
    pub fn generator(&self) -> &Generator<R> {
        &self.generator
    }

    /// Produce the report identified by `key`, serving from cache when a
    /// fresh artifact exists and generating (then storing) otherwise.
    pub async fn generate_report(
        &self,
        payload: &ReportPayload,
        key: &ReportKey,
        options: &GenerateReportOptions,
    ) -> CahierResult<ReportResult> {
        let storage_key = key.storage_key();

        if !options.skip_cache {
            if let Some(hit) = self.cache.get(key, &options.cache_read_options()).await? {
                debug!(key = %storage_key, "report served from cache");
                return Ok(ReportResult {
                    size_bytes: hit.content.len(),
                    from_cache: true,
                    generated_at: hit.generated_at,
                    cache_key: hit.cache_key,
                    generation_time_ms: None,
                    content: hit.content,
                });
            }
        }

        let started = Instant::now();
        let content = self
            .generator
            .generate(payload, &options.generate_options())
            .await?;
        let generation_time_ms = started.elapsed().as_millis() as u64;

        if !options.skip_cache {
            self.cache.set(key, &content).await?;
        }
        debug!(key = %storage_key, elapsed_ms = generation_time_ms, "report generated");

        Ok(ReportResult {
            size_bytes: content.len(),
            from_cache: false,
            generated_at: Utc::now(),
            cache_key: storage_key,
            generation_time_ms: Some(generation_time_ms),
            content,
        })
    }

    /// Streaming variant of [`ReportService::generate_report`].
    ///
    /// On a cache hit the stored bytes are streamed in fixed-size
    /// chunks. On a miss the generator's chunk stream is forwarded to
    /// the caller as it is consumed while being accumulated; once it is
    /// exhausted the accumulated buffer is written to the cache, so a
    /// storage failure there surfaces as the stream's final item.
    pub async fn generate_report_stream(
        &self,
        payload: &ReportPayload,
        key: &ReportKey,
        options: &GenerateReportOptions,
    ) -> CahierResult<BoxStream<'static, CahierResult<Vec<u8>>>>
    where
        S: 'static,
    {
        let chunk_size = self.generator.config().chunk_size;

        if !options.skip_cache {
            if let Some(hit) = self.cache.get(key, &options.cache_read_options()).await? {
                debug!(key = %hit.cache_key, "streaming report from cache");
                let chunks = chunk_bytes(&hit.content, chunk_size);
                return Ok(tokio_stream::iter(chunks.into_iter().map(Ok)).boxed());
            }
        }

        let mut generated = self
            .generator
            .generate_stream(payload, &options.generate_options())
            .await?;

        let cache = (!options.skip_cache).then(|| self.cache.clone());
        let key = key.clone();
        let stream = try_stream! {
            let mut accumulated: Vec<u8> = Vec::new();
            while let Some(chunk) = generated.next().await {
                accumulated.extend_from_slice(&chunk);
                yield chunk;
            }
            if let Some(cache) = cache {
                cache.set(&key, &accumulated).await?;
                debug!(key = %key.storage_key(), size = accumulated.len(), "streamed report cached");
            }
        };

        Ok(stream.boxed())
    }

    /// Delete the cached artifact for `key`.
    pub async fn invalidate(&self, key: &ReportKey) -> CahierResult<()> {
        self.cache.invalidate(key).await
    }

    /// Delete every cached artifact for one semester.
    pub async fn invalidate_semester(
        &self,
        semester: &str,
        academic_year: &str,
    ) -> CahierResult<u64> {
        self.cache.invalidate_semester(semester, academic_year).await
    }

    /// Delete every cached artifact for one student.
    pub async fn invalidate_student(&self, student_id: &str) -> CahierResult<u64> {
        self.cache.invalidate_student(student_id).await
    }

    /// Delete every cached artifact.
    pub async fn invalidate_all(&self) -> CahierResult<u64> {
        self.cache.invalidate_all().await
    }

    /// Counts of cached artifacts by report family.
    pub async fn cache_stats(&self) -> CahierResult<CacheStats> {
        self.cache.stats().await
    }
}

//! The report generator: progress, timeout, and streaming around a
//! renderer.

use crate::Renderer;
use cahier_core::{
    CahierResult, GenerationProgress, GenerationStage, GeneratorConfig, RenderError, ReportPayload,
};
use futures_util::Stream;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Callback receiving progress events during generation.
pub type ProgressCallback = Arc<dyn Fn(GenerationProgress) + Send + Sync>;

/// Options for one generation.
#[derive(Clone, Default)]
pub struct GenerateOptions {
    /// Per-call timeout override. `None` uses the generator's configured
    /// budget.
    pub timeout: Option<Duration>,
    /// Progress callback, invoked synchronously at fixed checkpoints.
    pub on_progress: Option<ProgressCallback>,
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the generation timeout for this call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attach a progress callback.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    fn emit(&self, stage: GenerationStage, percent: u8, message: &str) {
        if let Some(callback) = &self.on_progress {
            callback(GenerationProgress::new(stage, percent, message));
        }
    }
}

impl std::fmt::Debug for GenerateOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateOptions")
            .field("timeout", &self.timeout)
            .field("on_progress", &self.on_progress.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

/// Wraps a [`Renderer`] with progress reporting, a hard timeout, and a
/// chunked streaming mode.
pub struct Generator<R: Renderer> {
    renderer: Arc<R>,
    config: GeneratorConfig,
}

impl<R: Renderer> Generator<R> {
    pub fn new(renderer: Arc<R>, config: GeneratorConfig) -> Self {
        Self { renderer, config }
    }

    /// Create a generator with the default configuration.
    pub fn with_defaults(renderer: Arc<R>) -> Self {
        Self::new(renderer, GeneratorConfig::default())
    }

    /// The generator configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Produce PDF bytes for `payload` under a time budget.
    ///
    /// Progress is emitted at four fixed checkpoints: preparing (10%),
    /// rendering (30%), finalizing (90%), complete (100%). The render
    /// races the budget; on expiry the render future is dropped
    /// (cooperative cancellation at its next suspension point) and the
    /// call fails with [`RenderError::Timeout`]. A renderer failure
    /// propagates unchanged as [`RenderError::Failed`] or whatever error
    /// the renderer raised.
    pub async fn generate(
        &self,
        payload: &ReportPayload,
        options: &GenerateOptions,
    ) -> CahierResult<Vec<u8>> {
        let budget = options.timeout.unwrap_or(self.config.timeout);

        options.emit(GenerationStage::Preparing, 10, "Preparing report data");
        options.emit(GenerationStage::Rendering, 30, "Rendering document");

        let bytes = match tokio::time::timeout(budget, self.renderer.render(payload)).await {
            Ok(rendered) => rendered?,
            Err(_) => {
                let budget_ms = budget.as_millis() as u64;
                warn!(budget_ms, "report generation timed out");
                return Err(RenderError::Timeout { budget_ms }.into());
            }
        };

        options.emit(GenerationStage::Finalizing, 90, "Finalizing document");
        options.emit(GenerationStage::Complete, 100, "Report complete");
        debug!(size = bytes.len(), "report generated");

        Ok(bytes)
    }

    /// Streaming variant of [`Generator::generate`].
    ///
    /// Generates the full document, then re-chunks the buffer into
    /// fixed-size pieces and yields them in order. This is post-hoc
    /// chunking of a fully materialized buffer, not incremental
    /// rendering: it buys transport friendliness (HTTP chunked
    /// transfer), never memory savings.
    pub async fn generate_stream(
        &self,
        payload: &ReportPayload,
        options: &GenerateOptions,
    ) -> CahierResult<impl Stream<Item = Vec<u8>> + Send + Unpin + 'static> {
        let bytes = self.generate(payload, options).await?;
        let chunks = chunk_bytes(&bytes, self.config.chunk_size);
        Ok(tokio_stream::iter(chunks))
    }
}

impl<R: Renderer> std::fmt::Debug for Generator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("config", &self.config)
            .finish()
    }
}

/// Split `bytes` into consecutive chunks of `chunk_size`, the final
/// chunk carrying the remainder. Empty input yields no chunks.
pub fn chunk_bytes(bytes: &[u8], chunk_size: usize) -> Vec<Vec<u8>> {
    bytes.chunks(chunk_size).map(|c| c.to_vec()).collect()
}

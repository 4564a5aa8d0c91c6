//! Report artifact types: stored metadata, progress events, results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// MIME type stamped on every stored report.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Metadata persisted alongside every cached report artifact.
///
/// A fixed struct rather than a free-form map: every field the cache
/// layer reads is spelled out here, so a missing or misspelled metadata
/// key is a compile error instead of a silent staleness bug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMetadata {
    /// Always [`PDF_CONTENT_TYPE`] for report artifacts.
    pub content_type: String,
    /// When the artifact was generated. Drives TTL staleness checks.
    pub generated_at: DateTime<Utc>,
    /// Layout format version the artifact was rendered with.
    pub version: String,
    /// Hex SHA-256 of the stored bytes. Integrity bookkeeping only;
    /// never used for key derivation.
    pub content_hash: String,
}

impl StoredMetadata {
    /// Metadata for a freshly generated artifact.
    pub fn new(version: impl Into<String>, content_hash: impl Into<String>) -> Self {
        Self {
            content_type: PDF_CONTENT_TYPE.to_string(),
            generated_at: Utc::now(),
            version: version.into(),
            content_hash: content_hash.into(),
        }
    }

    /// Age of the artifact relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now.signed_duration_since(self.generated_at)
    }
}

/// Stage of an in-flight generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStage {
    Preparing,
    Rendering,
    Finalizing,
    Complete,
}

/// Progress event emitted during generation.
///
/// Ephemeral: delivered synchronously to a caller-supplied callback and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationProgress {
    pub stage: GenerationStage,
    /// 0-100.
    pub percent: u8,
    pub message: String,
}

impl GenerationProgress {
    pub fn new(stage: GenerationStage, percent: u8, message: impl Into<String>) -> Self {
        Self {
            stage,
            percent,
            message: message.into(),
        }
    }
}

/// The value returned to callers of the report orchestrator.
///
/// A transient view over either a cached artifact or freshly generated
/// bytes; created per call, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportResult {
    /// The PDF bytes.
    pub content: Vec<u8>,
    /// Whether the bytes came from the cache.
    pub from_cache: bool,
    /// When the bytes were generated (cache hit: the stored timestamp).
    pub generated_at: DateTime<Utc>,
    /// Length of `content`.
    pub size_bytes: usize,
    /// The storage key string the artifact lives under.
    pub cache_key: String,
    /// Wall-clock generation time. `None` on cache hits.
    pub generation_time_ms: Option<u64>,
}

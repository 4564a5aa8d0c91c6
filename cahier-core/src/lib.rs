//! Cahier Core - Report Subsystem Types
//!
//! Pure data structures and helpers with no I/O. All other crates in the
//! workspace depend on this one.

use sha2::{Digest, Sha256};

pub mod config;
pub mod error;
pub mod key;
pub mod payload;
pub mod report;

pub use config::{
    CacheConfig, GeneratorConfig, DEFAULT_GENERATION_TIMEOUT_MS, DEFAULT_STORAGE_PREFIX,
    DEFAULT_TTL_SECS, FORMAT_VERSION, STREAM_CHUNK_SIZE,
};
pub use error::{CahierError, CahierResult, ConfigError, RenderError, StorageError};
pub use key::{ReportKey, ReportKind};
pub use payload::{InterventionPlan, JournalEntry, MeetingLog, ReportPayload, StudentRecord};
pub use report::{
    GenerationProgress, GenerationStage, ReportResult, StoredMetadata, PDF_CONTENT_TYPE,
};

// ============================================================================
// HASHING HELPERS
// ============================================================================

/// Length of the data fingerprint in hex characters.
const FINGERPRINT_LEN: usize = 16;

/// Compute the hex SHA-256 hash of content.
///
/// Used for the integrity hash stored in artifact metadata; never used
/// for cache key derivation.
pub fn compute_content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Compute a fast fingerprint of serializable input data.
///
/// Order-sensitive over the value's canonical JSON serialization:
/// equal values always fingerprint identically, and any field change
/// produces a new fingerprint with overwhelming probability. This is a
/// cache discriminator, not a security primitive; collisions are
/// tolerable, so the digest is truncated for compact keys.
pub fn fingerprint<T: serde::Serialize>(value: &T) -> CahierResult<String> {
    let bytes = serde_json::to_vec(value).map_err(|e| CahierError::Encoding {
        reason: e.to_string(),
    })?;
    let digest = blake3::hash(&bytes);
    Ok(digest.to_hex()[..FINGERPRINT_LEN].to_string())
}

// ============================================================================
// TESTS
// ============================================================================

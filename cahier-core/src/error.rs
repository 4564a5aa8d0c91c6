//! Error types for Cahier report operations

use thiserror::Error;

/// Blob storage errors.
///
/// "Not found" is never an error anywhere in this crate family: absent
/// blobs and cache misses are represented as `Ok(None)`. These variants
/// cover genuine backend failures, which must surface to the caller
/// rather than being treated as misses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Write failed for key {key}: {reason}")]
    WriteFailed { key: String, reason: String },

    #[error("Read failed for key {key}: {reason}")]
    ReadFailed { key: String, reason: String },

    #[error("List failed for prefix {prefix}: {reason}")]
    ListFailed { prefix: String, reason: String },

    #[error("Storage backend unavailable: {reason}")]
    Backend { reason: String },
}

/// Report rendering errors.
///
/// Timeout is a distinct kind so callers can tell "renderer is slow"
/// (retry with a larger budget, or report the document as too large)
/// apart from "renderer is broken".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("Generation timed out after {budget_ms}ms")]
    Timeout { budget_ms: u64 },

    #[error("Generation failed: {reason}")]
    Failed { reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all Cahier report operations.
#[derive(Debug, Clone, Error)]
pub enum CahierError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Encoding error: {reason}")]
    Encoding { reason: String },
}

impl CahierError {
    /// Returns true if this error is a generation timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, CahierError::Render(RenderError::Timeout { .. }))
    }
}

/// Result type alias for Cahier report operations.
pub type CahierResult<T> = Result<T, CahierError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display_write_failed() {
        let err = StorageError::WriteFailed {
            key: "reports/student_abc".to_string(),
            reason: "bucket unavailable".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Write failed"));
        assert!(msg.contains("reports/student_abc"));
        assert!(msg.contains("bucket unavailable"));
    }

    #[test]
    fn test_render_error_display_timeout() {
        let err = RenderError::Timeout { budget_ms: 120_000 };
        let msg = format!("{}", err);
        assert!(msg.contains("timed out"));
        assert!(msg.contains("120000"));
    }

    #[test]
    fn test_config_error_display_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "chunk_size".to_string(),
            value: "0".to_string(),
            reason: "must be positive".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("chunk_size"));
        assert!(msg.contains("must be positive"));
    }

    #[test]
    fn test_cahier_error_from_variants() {
        let storage = CahierError::from(StorageError::Backend {
            reason: "down".to_string(),
        });
        assert!(matches!(storage, CahierError::Storage(_)));

        let render = CahierError::from(RenderError::Failed {
            reason: "bad template".to_string(),
        });
        assert!(matches!(render, CahierError::Render(_)));

        let config = CahierError::from(ConfigError::InvalidValue {
            field: "prefix".to_string(),
            value: "".to_string(),
            reason: "empty".to_string(),
        });
        assert!(matches!(config, CahierError::Config(_)));
    }

    #[test]
    fn test_is_timeout() {
        let timeout = CahierError::from(RenderError::Timeout { budget_ms: 100 });
        assert!(timeout.is_timeout());

        let failed = CahierError::from(RenderError::Failed {
            reason: "x".to_string(),
        });
        assert!(!failed.is_timeout());

        let storage = CahierError::from(StorageError::Backend {
            reason: "x".to_string(),
        });
        assert!(!storage.is_timeout());
    }
}

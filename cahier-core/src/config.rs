//! Configuration for the cache and generator layers.

use crate::error::{CahierResult, ConfigError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default TTL applied when a cache read does not specify one.
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// Fixed chunk size for streamed report bytes.
pub const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Current report layout format version.
pub const FORMAT_VERSION: &str = "1.0";

/// Default hard budget for one generation.
pub const DEFAULT_GENERATION_TIMEOUT_MS: u64 = 120_000;

/// Storage prefix all cached reports live under.
pub const DEFAULT_STORAGE_PREFIX: &str = "reports/";

/// Configuration for the report cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Namespace prefix prepended to every storage key.
    pub prefix: String,
    /// TTL used when a read passes no explicit TTL.
    pub default_ttl: Duration,
    /// Format version stamped on newly stored artifacts. Bumping it
    /// changes stored metadata only; it does not invalidate existing
    /// entries by itself.
    pub format_version: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            default_ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            format_version: FORMAT_VERSION.to_string(),
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the storage prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the default TTL.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Set the format version.
    pub fn with_format_version(mut self, version: impl Into<String>) -> Self {
        self.format_version = version.into();
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> CahierResult<()> {
        if self.prefix.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "prefix".to_string(),
                value: self.prefix.clone(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }
        if self.format_version.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "format_version".to_string(),
                value: self.format_version.clone(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Configuration for the report generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Hard budget for one generation; the render is abandoned when it
    /// expires.
    pub timeout: Duration,
    /// Chunk size for the streaming variant.
    pub chunk_size: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_GENERATION_TIMEOUT_MS),
            chunk_size: STREAM_CHUNK_SIZE,
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the generation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the stream chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> CahierResult<()> {
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "timeout".to_string(),
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            }
            .into());
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chunk_size".to_string(),
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.prefix, DEFAULT_STORAGE_PREFIX);
        assert_eq!(config.default_ttl, Duration::from_secs(3600));
        assert_eq!(config.format_version, FORMAT_VERSION);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cache_config_builder() {
        let config = CacheConfig::new()
            .with_prefix("cache/reports/")
            .with_default_ttl(Duration::from_secs(60))
            .with_format_version("2.0");

        assert_eq!(config.prefix, "cache/reports/");
        assert_eq!(config.default_ttl, Duration::from_secs(60));
        assert_eq!(config.format_version, "2.0");
    }

    #[test]
    fn test_cache_config_rejects_empty_prefix() {
        let config = CacheConfig::new().with_prefix("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_generator_config_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.timeout, Duration::from_millis(120_000));
        assert_eq!(config.chunk_size, 64 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generator_config_rejects_zero_timeout() {
        let config = GeneratorConfig::new().with_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_generator_config_rejects_zero_chunk_size() {
        let config = GeneratorConfig::new().with_chunk_size(0);
        assert!(config.validate().is_err());
    }
}

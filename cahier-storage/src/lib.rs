//! Cahier Storage - Blob Store Abstraction and Report Cache
//!
//! Defines the object-storage contract the report subsystem consumes
//! ([`BlobStore`]), two backends (in-memory and filesystem), the
//! prefix-namespacing storage service ([`ReportStore`]), and the cache
//! layer ([`ReportCache`]) with TTL staleness and prefix invalidation.

pub mod blob;
pub mod cache;
pub mod fs_store;
pub mod report_store;

pub use blob::{BlobStore, MemoryBlobStore};
pub use cache::{CacheReadOptions, CacheStats, CachedReport, ReportCache};
pub use fs_store::FsBlobStore;
pub use report_store::ReportStore;

// Re-export the cache configuration for API integration.
pub use cahier_core::CacheConfig;

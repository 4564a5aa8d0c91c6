//! Cahier Render - Renderer Abstraction and Report Generator
//!
//! The PDF layout engine itself is a collaborator: it lives behind the
//! [`Renderer`] trait and is supplied by the embedding application. This
//! crate wraps any renderer in a [`Generator`] that adds progress
//! reporting, a hard generation timeout, and a chunked streaming
//! variant.

use async_trait::async_trait;
use cahier_core::{CahierResult, ReportPayload};

pub mod generator;

pub use generator::{chunk_bytes, GenerateOptions, Generator, ProgressCallback};

/// Produces PDF bytes from a report payload.
///
/// Implementations must be thread-safe. Rendering is deterministic for
/// equal payloads; that determinism is what makes report caching sound.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Render the payload to PDF bytes.
    async fn render(&self, payload: &ReportPayload) -> CahierResult<Vec<u8>>;
}

/// Estimate generation wall-clock time for a document of `page_count`
/// pages, in milliseconds.
///
/// A simple linear model for progress UX and timeout budgeting; not a
/// correctness input.
pub fn estimate_generation_time(page_count: u32) -> u64 {
    page_count as u64 * 500 + 2000
}

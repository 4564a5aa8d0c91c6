//! Cahier Reports - Cache-First Orchestration
//!
//! [`ReportService`] is the façade route handlers talk to: "return
//! cached bytes if fresh, otherwise generate, store, and return". It
//! combines the cache layer from `cahier-storage` with the generator
//! from `cahier-render` and is stateless between calls.

pub mod service;

pub use service::{GenerateReportOptions, ReportService};

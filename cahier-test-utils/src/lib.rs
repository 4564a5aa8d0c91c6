//! Cahier Test Utilities
//!
//! Centralized test infrastructure for the Cahier workspace:
//! - Payload fixtures for every report family
//! - Mock renderers with controllable behavior
//! - An error-injecting blob store wrapper

use async_trait::async_trait;
use cahier_core::{
    CahierResult, InterventionPlan, JournalEntry, MeetingLog, RenderError, ReportPayload,
    StorageError, StoredMetadata, StudentRecord,
};
use cahier_render::Renderer;
use cahier_storage::{BlobStore, MemoryBlobStore};
use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

// ============================================================================
// PAYLOAD FIXTURES
// ============================================================================

/// A filled-in student record.
pub fn sample_student_record(student_id: &str) -> StudentRecord {
    StudentRecord {
        student_id: student_id.to_string(),
        full_name: format!("Student {student_id}"),
        class_group: "7B".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(2012, 3, 14),
        guardian_name: Some("A. Guardian".to_string()),
        guardian_contact: Some("guardian@example.com".to_string()),
    }
}

/// A biodata payload for one student.
pub fn sample_biodata(student_id: &str) -> ReportPayload {
    ReportPayload::StudentBiodata {
        record: sample_student_record(student_id),
    }
}

/// A summary payload with journals, a meeting, and an intervention.
pub fn sample_student_summary(student_id: &str) -> ReportPayload {
    ReportPayload::StudentSummary {
        record: sample_student_record(student_id),
        journals: (1..=3)
            .map(|month| JournalEntry {
                month,
                summary: format!("Month {month} went well"),
                attendance_days: 20,
                absence_days: 1,
            })
            .collect(),
        meetings: vec![MeetingLog {
            date: NaiveDate::from_ymd_opt(2024, 10, 2).expect("valid date"),
            participants: vec!["Teacher".to_string(), "Guardian".to_string()],
            notes: "Discussed progress".to_string(),
        }],
        interventions: vec![InterventionPlan {
            opened_on: NaiveDate::from_ymd_opt(2024, 9, 15).expect("valid date"),
            goal: "Improve reading fluency".to_string(),
            status: "ongoing".to_string(),
        }],
    }
}

/// A semester overview payload over `student_count` students.
pub fn sample_semester_overview(student_count: usize) -> ReportPayload {
    ReportPayload::SemesterOverview {
        semester: "1".to_string(),
        academic_year: "2024/2025".to_string(),
        students: (0..student_count)
            .map(|i| sample_student_record(&format!("s-{i}")))
            .collect(),
    }
}

/// Deterministic pseudo-PDF bytes of length `len`, starting with a PDF
/// header so content sniffers accept them.
pub fn pdf_bytes(len: usize) -> Vec<u8> {
    let header = b"%PDF-1.7\n";
    let mut bytes = Vec::with_capacity(len);
    bytes.extend_from_slice(&header[..header.len().min(len)]);
    let mut i: u8 = 0;
    while bytes.len() < len {
        bytes.push(i);
        i = i.wrapping_add(1);
    }
    bytes
}

// ============================================================================
// MOCK RENDERERS
// ============================================================================

/// Renderer returning fixed bytes.
#[derive(Debug, Clone)]
pub struct StaticRenderer {
    bytes: Vec<u8>,
}

impl StaticRenderer {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

#[async_trait]
impl Renderer for StaticRenderer {
    async fn render(&self, _payload: &ReportPayload) -> CahierResult<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// Renderer that counts invocations, for asserting whether the cache or
/// the generator served a request.
#[derive(Debug, Default)]
pub struct CountingRenderer {
    bytes: Vec<u8>,
    renders: AtomicUsize,
}

impl CountingRenderer {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            renders: AtomicUsize::new(0),
        }
    }

    /// Number of times `render` has run.
    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Renderer for CountingRenderer {
    async fn render(&self, _payload: &ReportPayload) -> CahierResult<Vec<u8>> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        Ok(self.bytes.clone())
    }
}

/// Renderer that sleeps before returning, for timeout and overlap
/// tests. Counts invocations like [`CountingRenderer`].
#[derive(Debug)]
pub struct SlowRenderer {
    bytes: Vec<u8>,
    delay: Duration,
    renders: AtomicUsize,
}

impl SlowRenderer {
    pub fn new(bytes: Vec<u8>, delay: Duration) -> Self {
        Self {
            bytes,
            delay,
            renders: AtomicUsize::new(0),
        }
    }

    /// Number of times `render` has run.
    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Renderer for SlowRenderer {
    async fn render(&self, _payload: &ReportPayload) -> CahierResult<Vec<u8>> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(self.bytes.clone())
    }
}

/// Renderer whose render never resolves, for timeout tests.
#[derive(Debug, Default)]
pub struct NeverRenderer;

#[async_trait]
impl Renderer for NeverRenderer {
    async fn render(&self, _payload: &ReportPayload) -> CahierResult<Vec<u8>> {
        std::future::pending().await
    }
}

/// Renderer that always fails.
#[derive(Debug, Default)]
pub struct FailingRenderer;

#[async_trait]
impl Renderer for FailingRenderer {
    async fn render(&self, _payload: &ReportPayload) -> CahierResult<Vec<u8>> {
        Err(RenderError::Failed {
            reason: "mock renderer failure".to_string(),
        }
        .into())
    }
}

// ============================================================================
// ERROR-INJECTING BLOB STORE
// ============================================================================

/// Blob store wrapper that fails selected operations on demand.
///
/// Backs onto a [`MemoryBlobStore`]; flip a flag and the corresponding
/// operation returns a backend error until flipped back. Used to prove
/// that storage failures surface instead of masquerading as cache
/// misses, and that batched deletes stay best-effort.
#[derive(Debug, Default)]
pub struct FlakyBlobStore {
    inner: MemoryBlobStore,
    fail_put: AtomicBool,
    fail_get: AtomicBool,
    fail_head: AtomicBool,
    fail_delete: AtomicBool,
    fail_list: AtomicBool,
}

impl FlakyBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &MemoryBlobStore {
        &self.inner
    }

    pub fn fail_put(&self, fail: bool) {
        self.fail_put.store(fail, Ordering::SeqCst);
    }

    pub fn fail_get(&self, fail: bool) {
        self.fail_get.store(fail, Ordering::SeqCst);
    }

    pub fn fail_head(&self, fail: bool) {
        self.fail_head.store(fail, Ordering::SeqCst);
    }

    pub fn fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    fn check(&self, flag: &AtomicBool, op: &str) -> CahierResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(StorageError::Backend {
                reason: format!("injected {op} failure"),
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for FlakyBlobStore {
    async fn put(&self, key: &str, bytes: &[u8], metadata: StoredMetadata) -> CahierResult<()> {
        self.check(&self.fail_put, "put")?;
        self.inner.put(key, bytes, metadata).await
    }

    async fn get(&self, key: &str) -> CahierResult<Option<Vec<u8>>> {
        self.check(&self.fail_get, "get")?;
        self.inner.get(key).await
    }

    async fn head(&self, key: &str) -> CahierResult<Option<StoredMetadata>> {
        self.check(&self.fail_head, "head")?;
        self.inner.head(key).await
    }

    async fn delete(&self, key: &str) -> CahierResult<()> {
        self.check(&self.fail_delete, "delete")?;
        self.inner.delete(key).await
    }

    async fn list(&self, prefix: &str) -> CahierResult<Vec<String>> {
        self.check(&self.fail_list, "list")?;
        self.inner.list(prefix).await
    }
}

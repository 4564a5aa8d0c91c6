//! Report cache key derivation.
//!
//! A [`ReportKey`] identifies exactly one cacheable report artifact. The
//! string form produced by [`ReportKey::storage_key`] is a contract: the
//! same field values must always serialize to the same string, across
//! calls and across process restarts, because prefix scans
//! ([`ReportKey::semester_prefix`], [`ReportKey::student_prefix`]) rely
//! on the field ordering to find every key belonging to a semester or a
//! student.
//!
//! # String format
//!
//! `{kind}[_{semester}][_{academic_year}][_{student_id}][_{data_hash}]`
//!
//! Fields are omitted when absent, joined with `_`, in that fixed order.
//! Academic years are written with `/` replaced by `-` (`2024/2025` →
//! `2024-2025`) so the year never introduces a path-like separator into
//! the key.
//!
//! # Construction
//!
//! Keys can only be built through [`ReportKey::semester`] and
//! [`ReportKey::student`]. A student key never carries semester fields;
//! this keeps every key for one student under the `student_{id}` prefix,
//! which is what makes per-student invalidation a plain prefix scan.

use serde::{Deserialize, Serialize};

/// Separator between key fields.
const SEPARATOR: &str = "_";

/// Which family of report a key identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// Semester-wide report covering every student in a class group.
    Semester,
    /// Per-student report (biodata or summary).
    Student,
}

impl ReportKind {
    /// Stable string tag used as the leading key field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Semester => "semester",
            ReportKind::Student => "student",
        }
    }
}

/// Identifies one cacheable report artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportKey {
    kind: ReportKind,
    semester: Option<String>,
    academic_year: Option<String>,
    student_id: Option<String>,
    data_hash: Option<String>,
}

impl ReportKey {
    /// Key for a semester-wide report.
    pub fn semester(semester: impl Into<String>, academic_year: impl Into<String>) -> Self {
        Self {
            kind: ReportKind::Semester,
            semester: Some(semester.into()),
            academic_year: Some(academic_year.into()),
            student_id: None,
            data_hash: None,
        }
    }

    /// Key for a per-student report.
    pub fn student(student_id: impl Into<String>) -> Self {
        Self {
            kind: ReportKind::Student,
            semester: None,
            academic_year: None,
            student_id: Some(student_id.into()),
            data_hash: None,
        }
    }

    /// Attach a data fingerprint, producing a key that changes whenever
    /// the upstream data changes (see [`crate::fingerprint`]).
    pub fn with_data_hash(mut self, data_hash: impl Into<String>) -> Self {
        self.data_hash = Some(data_hash.into());
        self
    }

    /// The report family this key belongs to.
    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    /// The student id, for `Student`-kind keys.
    pub fn student_id(&self) -> Option<&str> {
        self.student_id.as_deref()
    }

    /// The data fingerprint, if one was attached.
    pub fn data_hash(&self) -> Option<&str> {
        self.data_hash.as_deref()
    }

    /// Serialize to the canonical storage key string.
    ///
    /// Deterministic: equal field values always produce the identical
    /// string. Empty optional fields are skipped entirely rather than
    /// leaving a dangling separator.
    pub fn storage_key(&self) -> String {
        let mut parts: Vec<String> = vec![self.kind.as_str().to_string()];
        if let Some(semester) = non_empty(&self.semester) {
            parts.push(semester.to_string());
        }
        if let Some(year) = non_empty(&self.academic_year) {
            parts.push(sanitize_year(year));
        }
        if let Some(student_id) = non_empty(&self.student_id) {
            parts.push(student_id.to_string());
        }
        if let Some(data_hash) = non_empty(&self.data_hash) {
            parts.push(data_hash.to_string());
        }
        parts.join(SEPARATOR)
    }

    /// Prefix matching every key of one kind. Used for cache statistics.
    pub fn kind_prefix(kind: ReportKind) -> String {
        format!("{}{}", kind.as_str(), SEPARATOR)
    }

    /// Prefix matching every key for one semester of one academic year.
    pub fn semester_prefix(semester: &str, academic_year: &str) -> String {
        format!(
            "{}{}{}{}{}",
            ReportKind::Semester.as_str(),
            SEPARATOR,
            semester,
            SEPARATOR,
            sanitize_year(academic_year)
        )
    }

    /// Prefix matching every key for one student.
    pub fn student_prefix(student_id: &str) -> String {
        format!("{}{}{}", ReportKind::Student.as_str(), SEPARATOR, student_id)
    }

    /// Whether `key` belongs to the artifact family identified by
    /// `prefix`.
    ///
    /// A plain `starts_with` would let `student_S1` claim the keys of
    /// `student_S12`; the match therefore requires the prefix to end at
    /// a field boundary.
    pub fn matches_prefix(key: &str, prefix: &str) -> bool {
        match key.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with(SEPARATOR),
            None => false,
        }
    }
}

impl std::fmt::Display for ReportKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.storage_key())
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn sanitize_year(year: &str) -> String {
    year.replace('/', "-")
}

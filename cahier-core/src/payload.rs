//! Report payload types.
//!
//! These are the structured inputs handed to the renderer: the student
//! record itself plus the journal, meeting, and intervention entries a
//! report draws on. They arrive from the record-keeping layer and are
//! assumed valid; this crate only carries them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One student's registry record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_id: String,
    pub full_name: String,
    /// Class group label, e.g. "7B".
    pub class_group: String,
    pub date_of_birth: Option<NaiveDate>,
    pub guardian_name: Option<String>,
    pub guardian_contact: Option<String>,
}

/// One monthly journal entry for a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Month within the semester, 1-based.
    pub month: u8,
    pub summary: String,
    pub attendance_days: u16,
    pub absence_days: u16,
}

/// A logged meeting (parent conference, case discussion).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingLog {
    pub date: NaiveDate,
    pub participants: Vec<String>,
    pub notes: String,
}

/// An intervention plan opened for a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterventionPlan {
    pub opened_on: NaiveDate,
    pub goal: String,
    /// Free-form status label, e.g. "ongoing", "closed".
    pub status: String,
}

/// The rendering input for one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum ReportPayload {
    /// Single-page biodata sheet for one student.
    StudentBiodata { record: StudentRecord },
    /// Full per-student semester summary.
    StudentSummary {
        record: StudentRecord,
        journals: Vec<JournalEntry>,
        meetings: Vec<MeetingLog>,
        interventions: Vec<InterventionPlan>,
    },
    /// Semester-wide overview of a class group.
    SemesterOverview {
        semester: String,
        academic_year: String,
        students: Vec<StudentRecord>,
    },
}

impl ReportPayload {
    /// Rough page count for the rendered document, used to pick timeout
    /// budgets and drive progress UX. Not a correctness input.
    pub fn page_estimate(&self) -> u32 {
        match self {
            ReportPayload::StudentBiodata { .. } => 1,
            ReportPayload::StudentSummary {
                journals,
                meetings,
                interventions,
                ..
            } => {
                let sections = journals.len() + meetings.len() + interventions.len();
                // Cover page plus roughly four entries per page.
                1 + (sections as u32).div_ceil(4)
            }
            ReportPayload::SemesterOverview { students, .. } => {
                // Ten student rows per page, at least one page.
                (students.len() as u32).div_ceil(10).max(1)
            }
        }
    }

    /// The student id this payload concerns, when it concerns one.
    pub fn student_id(&self) -> Option<&str> {
        match self {
            ReportPayload::StudentBiodata { record }
            | ReportPayload::StudentSummary { record, .. } => Some(&record.student_id),
            ReportPayload::SemesterOverview { .. } => None,
        }
    }
}

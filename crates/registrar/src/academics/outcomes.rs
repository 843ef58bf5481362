use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ClassroomId, ProgramId, StudentId};

/// Immutable graduation decision for one (student, program) pair.
///
/// Student identity and the program name are captured as plain values at
/// decision time so the record survives deletion of the live rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraduationRecord {
    pub student_id: StudentId,
    pub student_name: String,
    pub national_id: String,
    pub email: String,
    pub program_id: ProgramId,
    pub program_name: String,
    pub decided_at: DateTime<Utc>,
    pub gpa: f64,
}

/// Immutable failure decision for one (student, program) pair. Carries an
/// empty notes field for later annotation by advisory staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub student_id: StudentId,
    pub student_name: String,
    pub national_id: String,
    pub email: String,
    pub program_id: ProgramId,
    pub program_name: String,
    pub decided_at: DateTime<Utc>,
    pub gpa: f64,
    pub notes: String,
}

/// Snapshot of one enrollment taken by the archive pipeline. Fully
/// denormalized: the live student and enrollment rows are deleted in the same
/// operation that creates this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedEnrollment {
    pub student_name: String,
    pub national_id: String,
    pub practical_grade: Option<f64>,
    pub exam_grade: Option<f64>,
    pub final_grade: Option<f64>,
}

/// Snapshot of a retired classroom, owning its archived enrollments (1:N).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedClassroom {
    pub classroom_id: ClassroomId,
    pub classroom_name: String,
    pub course_name: String,
    pub program_name: String,
    pub teacher_name: Option<String>,
    pub archived_at: DateTime<Utc>,
    pub enrollments: Vec<ArchivedEnrollment>,
}

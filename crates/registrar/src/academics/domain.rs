use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::AcademicError;

/// Identifier wrapper for students.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StudentId(pub String);

/// Identifier wrapper for academic programs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProgramId(pub String);

/// Identifier wrapper for courses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CourseId(pub String);

/// Identifier wrapper for classrooms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassroomId(pub String);

/// Identifier wrapper for enrollments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnrollmentId(pub String);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ClassroomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Student account as supplied by the (out-of-scope) user management system.
/// The identity fields are denormalized into outcome records at decision time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub full_name: String,
    pub national_id: String,
    pub email: String,
    pub program_id: ProgramId,
}

/// Academic program owning a set of required courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: ProgramId,
    pub name: String,
}

/// Course under a program. Every course currently attached to a program is
/// required for graduation from that program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub program_id: ProgramId,
}

/// Live classroom row. Archival is modelled by deleting this row and creating
/// an [`super::outcomes::ArchivedClassroom`], never by a status value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classroom {
    pub id: ClassroomId,
    pub name: String,
    pub course_id: CourseId,
    pub teacher_name: Option<String>,
    pub capacity: usize,
    pub status: ClassroomStatus,
}

/// Lifecycle state gating which mutations are legal against a classroom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassroomStatus {
    Active,
    Completed,
}

impl ClassroomStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ClassroomStatus::Active => "active",
            ClassroomStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ClassroomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Links one student to one classroom and carries the grade fields.
///
/// The final grade is written only by the classroom-wide finalize operation,
/// never as a side effect of raw grade entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub student_id: StudentId,
    pub classroom_id: ClassroomId,
    pub practical_grade: Option<f64>,
    pub exam_grade: Option<f64>,
    pub final_grade: Option<f64>,
    pub enrolled_at: DateTime<Utc>,
}

impl Enrollment {
    /// Both raw grades present, so the enrollment can take part in a
    /// classroom-wide finalization.
    pub fn has_raw_grades(&self) -> bool {
        self.practical_grade.is_some() && self.exam_grade.is_some()
    }
}

/// Validate a grade into the closed `[0, 100]` range.
pub fn validate_grade(value: f64) -> Result<f64, AcademicError> {
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(AcademicError::GradeOutOfRange(value))
    }
}

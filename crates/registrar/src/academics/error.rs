use axum::http::StatusCode;

use super::domain::{ClassroomId, ClassroomStatus, CourseId, EnrollmentId, ProgramId, StudentId};

/// Error taxonomy for the academic lifecycle core.
///
/// Precondition violations are detected before any mutation begins; only a
/// failure inside the archive pipeline's transactional body surfaces as
/// [`AcademicError::TransactionAborted`], and by then the store has already
/// been rolled back.
#[derive(Debug, thiserror::Error)]
pub enum AcademicError {
    #[error("classroom {0} not found")]
    ClassroomNotFound(ClassroomId),
    #[error("program {0} not found")]
    ProgramNotFound(ProgramId),
    #[error("course {0} not found")]
    CourseNotFound(CourseId),
    #[error("student {0} not found")]
    StudentNotFound(StudentId),
    #[error("enrollment {0} not found in classroom {1}")]
    EnrollmentNotFound(EnrollmentId, ClassroomId),
    #[error("classroom {id} is {actual}, operation requires {expected}")]
    InvalidState {
        id: ClassroomId,
        actual: ClassroomStatus,
        expected: ClassroomStatus,
    },
    #[error("grade {0} is outside the 0-100 range")]
    GradeOutOfRange(f64),
    #[error("classroom {0} is not gradeable yet: enrollment {1} is missing raw grades")]
    NotGradeable(ClassroomId, EnrollmentId),
    #[error("classroom {0} has no enrollments to finalize")]
    NoEnrollments(ClassroomId),
    #[error("classroom {0} cannot be completed: enrollment {1} has no final grade")]
    MissingFinalGrade(ClassroomId, EnrollmentId),
    #[error("classroom {0} is full (capacity {1})")]
    CapacityExceeded(ClassroomId, usize),
    #[error("student {0} is already enrolled in classroom {1}")]
    AlreadyEnrolled(StudentId, ClassroomId),
    #[error(
        "cannot archive classroom {classroom}: student {student} ({name}) holds no \
         graduation or failure record for program {program}"
    )]
    UnresolvedOutcome {
        classroom: ClassroomId,
        student: StudentId,
        name: String,
        program: ProgramId,
    },
    #[error("a terminal outcome already exists for student {0} in program {1}")]
    DuplicateOutcome(StudentId, ProgramId),
    #[error("archive aborted, no changes were applied: {0}")]
    TransactionAborted(String),
}

impl AcademicError {
    /// HTTP status used by the router and by the application error boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AcademicError::ClassroomNotFound(_)
            | AcademicError::ProgramNotFound(_)
            | AcademicError::CourseNotFound(_)
            | AcademicError::StudentNotFound(_)
            | AcademicError::EnrollmentNotFound(_, _) => StatusCode::NOT_FOUND,
            AcademicError::InvalidState { .. }
            | AcademicError::AlreadyEnrolled(_, _)
            | AcademicError::DuplicateOutcome(_, _) => StatusCode::CONFLICT,
            AcademicError::GradeOutOfRange(_)
            | AcademicError::NotGradeable(_, _)
            | AcademicError::NoEnrollments(_)
            | AcademicError::MissingFinalGrade(_, _)
            | AcademicError::CapacityExceeded(_, _)
            | AcademicError::UnresolvedOutcome { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AcademicError::TransactionAborted(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

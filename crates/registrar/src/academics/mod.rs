//! Academic lifecycle pipeline: grade ledger, classroom lifecycle, batch
//! graduation evaluation, and the atomic archive of completed classrooms.
//!
//! All mutations flow through [`store::AcademicStore`]'s unit-of-work
//! transaction, which is what gives finalization and archival their
//! all-or-nothing semantics.

pub mod archive;
pub mod domain;
pub mod error;
pub(crate) mod grades;
pub mod graduation;
pub(crate) mod lifecycle;
pub mod outcomes;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use archive::{ArchiveNotifier, ArchiveReceipt, NotifyError};
pub use domain::{
    validate_grade, Classroom, ClassroomId, ClassroomStatus, Course, CourseId, Enrollment,
    EnrollmentId, Program, ProgramId, Student, StudentId,
};
pub use error::AcademicError;
pub use grades::GradeFinalization;
pub use graduation::{EvaluationSummary, GradingPolicy};
pub use outcomes::{ArchivedClassroom, ArchivedEnrollment, FailureRecord, GraduationRecord};
pub use router::academics_router;
pub use service::RegistrarService;
pub use store::{AcademicStore, StoreState};

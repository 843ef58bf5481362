use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use super::domain::{ClassroomId, ClassroomStatus};
use super::error::AcademicError;
use super::outcomes::{ArchivedClassroom, ArchivedEnrollment};
use super::store::StoreState;

/// Outbound hook invoked after the snapshot is built but before the
/// transaction commits (e.g., an audit log or records-office feed). An error
/// here aborts the archive and rolls everything back.
pub trait ArchiveNotifier: Send + Sync {
    fn notify(&self, receipt: &ArchiveReceipt) -> Result<(), NotifyError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("archive notification transport unavailable: {0}")]
    Transport(String),
}

/// Summary handed back to the caller once the archive has committed.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveReceipt {
    pub classroom_id: ClassroomId,
    pub classroom_name: String,
    pub enrollments_archived: usize,
    pub students_removed: usize,
    pub archived_at: DateTime<Utc>,
}

/// Atomically retire a completed classroom.
///
/// Preconditions are checked before any mutation: the classroom must exist,
/// must be `Completed`, and every enrolled student must already hold a
/// terminal outcome for the classroom's program. The body then snapshots the
/// classroom and its enrollments as plain values, deletes the live rows, and
/// deletes each formerly enrolled student's account. Runs inside one store
/// transaction, so a failure at any step leaves the store untouched.
pub(crate) fn archive_classroom<N: ArchiveNotifier>(
    state: &mut StoreState,
    classroom_id: &ClassroomId,
    notifier: &N,
    now: DateTime<Utc>,
) -> Result<ArchiveReceipt, AcademicError> {
    let classroom = state.classroom(classroom_id)?.clone();
    if classroom.status != ClassroomStatus::Completed {
        return Err(AcademicError::InvalidState {
            id: classroom_id.clone(),
            actual: classroom.status,
            expected: ClassroomStatus::Completed,
        });
    }

    let course = state.course(&classroom.course_id)?.clone();
    let program = state.program(&course.program_id)?.clone();

    let enrollments: Vec<_> = state
        .classroom_enrollments(classroom_id)
        .into_iter()
        .cloned()
        .collect();

    // Outcome precondition for every enrolled student, before any mutation.
    for enrollment in &enrollments {
        let student = state.student(&enrollment.student_id)?;
        if !state.has_outcome(&student.id, &program.id) {
            return Err(AcademicError::UnresolvedOutcome {
                classroom: classroom_id.clone(),
                student: student.id.clone(),
                name: student.full_name.clone(),
                program: program.id.clone(),
            });
        }
    }

    let mut archived_enrollments = Vec::with_capacity(enrollments.len());
    for enrollment in &enrollments {
        let student = state.student(&enrollment.student_id)?;
        archived_enrollments.push(ArchivedEnrollment {
            student_name: student.full_name.clone(),
            national_id: student.national_id.clone(),
            practical_grade: enrollment.practical_grade,
            exam_grade: enrollment.exam_grade,
            final_grade: enrollment.final_grade,
        });
    }

    let snapshot = ArchivedClassroom {
        classroom_id: classroom_id.clone(),
        classroom_name: classroom.name.clone(),
        course_name: course.name.clone(),
        program_name: program.name.clone(),
        teacher_name: classroom.teacher_name.clone(),
        archived_at: now,
        enrollments: archived_enrollments,
    };
    let enrollments_archived = snapshot.enrollments.len();
    state.archived_classrooms.push(snapshot);

    // Delete live rows: classroom, its enrollments, then the student accounts
    // themselves. The account delete is unconditional once the outcome
    // precondition holds, even when the student still has live enrollments
    // elsewhere; that case is logged, and the delete cascades to those
    // enrollments so no live row is left referencing a removed account.
    state.classrooms.remove(classroom_id);
    let mut students_removed = 0;
    for enrollment in &enrollments {
        state.enrollments.remove(&enrollment.id);
    }
    for enrollment in &enrollments {
        if state.student_has_other_active_relationship(&enrollment.student_id, classroom_id) {
            warn!(
                student = %enrollment.student_id,
                classroom = %classroom_id,
                "deleting student account that still holds live enrollments elsewhere"
            );
        }
        if state.remove_student(&enrollment.student_id) {
            students_removed += 1;
        }
    }

    let receipt = ArchiveReceipt {
        classroom_id: classroom_id.clone(),
        classroom_name: classroom.name,
        enrollments_archived,
        students_removed,
        archived_at: now,
    };

    notifier
        .notify(&receipt)
        .map_err(|err| AcademicError::TransactionAborted(err.to_string()))?;

    Ok(receipt)
}

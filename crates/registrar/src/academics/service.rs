use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::archive::{self, ArchiveNotifier, ArchiveReceipt};
use super::domain::{ClassroomId, EnrollmentId, ProgramId, StudentId};
use super::error::AcademicError;
use super::grades::{self, GradeFinalization};
use super::graduation::{self, EvaluationSummary, GradingPolicy};
use super::lifecycle;
use super::store::AcademicStore;

/// Facade composing the transactional store, the grading policy, and the
/// archive notification hook. Every operation is one unit of work against
/// the shared store; none of them is retried automatically.
pub struct RegistrarService<N> {
    store: Arc<AcademicStore>,
    notifier: Arc<N>,
    policy: GradingPolicy,
}

impl<N> RegistrarService<N>
where
    N: ArchiveNotifier + 'static,
{
    pub fn new(store: Arc<AcademicStore>, notifier: Arc<N>) -> Self {
        Self::with_policy(store, notifier, GradingPolicy::default())
    }

    pub fn with_policy(store: Arc<AcademicStore>, notifier: Arc<N>, policy: GradingPolicy) -> Self {
        Self {
            store,
            notifier,
            policy,
        }
    }

    /// Shared store handle, used by infrastructure for seeding and reporting.
    pub fn store(&self) -> &Arc<AcademicStore> {
        &self.store
    }

    /// Enroll a student into an active classroom with a free seat.
    pub fn enroll_student(
        &self,
        classroom_id: &ClassroomId,
        student_id: &StudentId,
    ) -> Result<EnrollmentId, AcademicError> {
        let now = Utc::now();
        self.store
            .transaction(|state| state.enroll_student(classroom_id, student_id, now))
    }

    /// Record (overwrite) the raw practical and exam grades of one enrollment.
    pub fn record_raw_grades(
        &self,
        classroom_id: &ClassroomId,
        enrollment_id: &EnrollmentId,
        practical: f64,
        exam: f64,
    ) -> Result<(), AcademicError> {
        self.store.transaction(|state| {
            grades::record_raw_grades(state, classroom_id, enrollment_id, practical, exam)
        })
    }

    /// Compute every final grade of a classroom in one all-or-nothing pass.
    pub fn finalize_classroom_grades(
        &self,
        classroom_id: &ClassroomId,
    ) -> Result<GradeFinalization, AcademicError> {
        let outcome = self
            .store
            .transaction(|state| grades::finalize_classroom_grades(state, classroom_id))?;
        info!(
            classroom = %outcome.classroom_id,
            enrollments = outcome.enrollments_finalized,
            "classroom grades finalized"
        );
        Ok(outcome)
    }

    /// Mark an active, fully graded classroom as completed.
    pub fn mark_completed(&self, classroom_id: &ClassroomId) -> Result<(), AcademicError> {
        self.store
            .transaction(|state| lifecycle::mark_completed(state, classroom_id))
    }

    /// Reopen a completed classroom.
    pub fn reactivate(&self, classroom_id: &ClassroomId) -> Result<(), AcademicError> {
        self.store
            .transaction(|state| lifecycle::reactivate(state, classroom_id))
    }

    /// Run the batch graduation/failure evaluation for one program.
    pub fn evaluate_program(
        &self,
        program_id: &ProgramId,
    ) -> Result<EvaluationSummary, AcademicError> {
        let now = Utc::now();
        let summary = self
            .store
            .transaction(|state| graduation::evaluate_program(state, program_id, &self.policy, now))?;
        info!(
            program = %program_id,
            new_graduates = summary.new_graduates,
            new_failures = summary.new_failures,
            "program evaluation finished"
        );
        Ok(summary)
    }

    /// Atomically snapshot and delete a completed, fully classified classroom.
    pub fn archive_classroom(
        &self,
        classroom_id: &ClassroomId,
    ) -> Result<ArchiveReceipt, AcademicError> {
        let now = Utc::now();
        let notifier = self.notifier.clone();
        let receipt = self.store.transaction(|state| {
            archive::archive_classroom(state, classroom_id, notifier.as_ref(), now)
        })?;
        info!(
            classroom = %receipt.classroom_id,
            enrollments = receipt.enrollments_archived,
            students = receipt.students_removed,
            "classroom archived"
        );
        Ok(receipt)
    }
}

use serde::Serialize;

use super::domain::{validate_grade, ClassroomId, ClassroomStatus, EnrollmentId};
use super::error::AcademicError;
use super::store::StoreState;

/// Result of a classroom-wide finalization pass.
#[derive(Debug, Clone, Serialize)]
pub struct GradeFinalization {
    pub classroom_id: ClassroomId,
    pub enrollments_finalized: usize,
}

/// Overwrite the raw practical and exam grades of one enrollment.
///
/// Overwriting is total, not additive, and never touches the final grade.
pub(crate) fn record_raw_grades(
    state: &mut StoreState,
    classroom_id: &ClassroomId,
    enrollment_id: &EnrollmentId,
    practical: f64,
    exam: f64,
) -> Result<(), AcademicError> {
    require_active(state, classroom_id)?;
    let practical = validate_grade(practical)?;
    let exam = validate_grade(exam)?;

    let enrollment = state
        .enrollments
        .get_mut(enrollment_id)
        .filter(|enrollment| enrollment.classroom_id == *classroom_id)
        .ok_or_else(|| {
            AcademicError::EnrollmentNotFound(enrollment_id.clone(), classroom_id.clone())
        })?;

    enrollment.practical_grade = Some(practical);
    enrollment.exam_grade = Some(exam);
    Ok(())
}

/// Set every enrollment's final grade to `(practical + exam) / 2` in one
/// pass. All-or-nothing at classroom granularity: if any enrollment is
/// missing a raw grade, the whole call fails and nothing is modified.
pub(crate) fn finalize_classroom_grades(
    state: &mut StoreState,
    classroom_id: &ClassroomId,
) -> Result<GradeFinalization, AcademicError> {
    require_active(state, classroom_id)?;

    let enrollment_ids: Vec<EnrollmentId> = {
        let enrollments = state.classroom_enrollments(classroom_id);
        if enrollments.is_empty() {
            return Err(AcademicError::NoEnrollments(classroom_id.clone()));
        }
        if let Some(blocking) = enrollments
            .iter()
            .find(|enrollment| !enrollment.has_raw_grades())
        {
            return Err(AcademicError::NotGradeable(
                classroom_id.clone(),
                blocking.id.clone(),
            ));
        }
        enrollments
            .iter()
            .map(|enrollment| enrollment.id.clone())
            .collect()
    };

    for id in &enrollment_ids {
        let enrollment = state
            .enrollments
            .get_mut(id)
            .expect("enrollment ids were read under the same lock");
        let practical = enrollment
            .practical_grade
            .expect("raw grades checked above");
        let exam = enrollment.exam_grade.expect("raw grades checked above");
        enrollment.final_grade = Some((practical + exam) / 2.0);
    }

    Ok(GradeFinalization {
        classroom_id: classroom_id.clone(),
        enrollments_finalized: enrollment_ids.len(),
    })
}

fn require_active(state: &StoreState, classroom_id: &ClassroomId) -> Result<(), AcademicError> {
    let classroom = state.classroom(classroom_id)?;
    if classroom.status != ClassroomStatus::Active {
        return Err(AcademicError::InvalidState {
            id: classroom_id.clone(),
            actual: classroom.status,
            expected: ClassroomStatus::Active,
        });
    }
    Ok(())
}

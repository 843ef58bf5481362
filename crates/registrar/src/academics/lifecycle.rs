use super::domain::{ClassroomId, ClassroomStatus};
use super::error::AcademicError;
use super::store::StoreState;

/// Transition `Active -> Completed`.
///
/// Completion is gated on grade completeness: if the classroom has any
/// enrollments, every one must already carry a final grade, by whatever means
/// it got there. A classroom with zero enrollments may complete freely.
pub(crate) fn mark_completed(
    state: &mut StoreState,
    classroom_id: &ClassroomId,
) -> Result<(), AcademicError> {
    require_status(state, classroom_id, ClassroomStatus::Active)?;

    if let Some(blocking) = state
        .classroom_enrollments(classroom_id)
        .iter()
        .find(|enrollment| enrollment.final_grade.is_none())
    {
        return Err(AcademicError::MissingFinalGrade(
            classroom_id.clone(),
            blocking.id.clone(),
        ));
    }

    state.classroom_mut(classroom_id)?.status = ClassroomStatus::Completed;
    Ok(())
}

/// Transition `Completed -> Active`, undoing a premature completion.
/// Unconditional apart from the state gate.
pub(crate) fn reactivate(
    state: &mut StoreState,
    classroom_id: &ClassroomId,
) -> Result<(), AcademicError> {
    require_status(state, classroom_id, ClassroomStatus::Completed)?;
    state.classroom_mut(classroom_id)?.status = ClassroomStatus::Active;
    Ok(())
}

fn require_status(
    state: &StoreState,
    classroom_id: &ClassroomId,
    expected: ClassroomStatus,
) -> Result<(), AcademicError> {
    let classroom = state.classroom(classroom_id)?;
    if classroom.status != expected {
        return Err(AcademicError::InvalidState {
            id: classroom_id.clone(),
            actual: classroom.status,
            expected,
        });
    }
    Ok(())
}

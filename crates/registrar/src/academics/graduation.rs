use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::domain::{CourseId, ProgramId, Student};
use super::error::AcademicError;
use super::outcomes::{FailureRecord, GraduationRecord};
use super::store::StoreState;

/// Threshold configuration for the batch evaluator.
#[derive(Debug, Clone, Copy)]
pub struct GradingPolicy {
    pub passing_gpa: f64,
}

impl Default for GradingPolicy {
    fn default() -> Self {
        Self { passing_gpa: 60.0 }
    }
}

/// Counts of records created by one evaluator run. Students skipped for
/// idempotency or left unclassified do not appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationSummary {
    pub new_graduates: usize,
    pub new_failures: usize,
}

/// Batch-classify every student of a program exactly once.
///
/// A student is classified only when they hold a completed, finally-graded
/// enrollment for every course currently required by the program. Everyone
/// else is left untouched and stays eligible for a future run. Already
/// classified students are skipped outright, so re-running is always safe.
pub(crate) fn evaluate_program(
    state: &mut StoreState,
    program_id: &ProgramId,
    policy: &GradingPolicy,
    now: DateTime<Utc>,
) -> Result<EvaluationSummary, AcademicError> {
    let program = state.program(program_id)?.clone();

    let required: BTreeSet<CourseId> = state
        .courses
        .values()
        .filter(|course| course.program_id == *program_id)
        .map(|course| course.id.clone())
        .collect();

    let mut students: Vec<Student> = state
        .students
        .values()
        .filter(|student| student.program_id == *program_id)
        .cloned()
        .collect();
    students.sort_by(|a, b| a.id.cmp(&b.id));

    let mut summary = EvaluationSummary {
        new_graduates: 0,
        new_failures: 0,
    };

    for student in students {
        if state.has_outcome(&student.id, program_id) {
            debug!(student = %student.id, program = %program_id, "already classified, skipping");
            continue;
        }

        let (completed, grades) = relevant_completions(state, &student, &required);
        if completed.is_empty() || !completed.is_superset(&required) {
            continue;
        }

        let gpa = grades.iter().sum::<f64>() / grades.len() as f64;
        if gpa >= policy.passing_gpa {
            state.insert_graduation_record(GraduationRecord {
                student_id: student.id.clone(),
                student_name: student.full_name.clone(),
                national_id: student.national_id.clone(),
                email: student.email.clone(),
                program_id: program_id.clone(),
                program_name: program.name.clone(),
                decided_at: now,
                gpa,
            })?;
            summary.new_graduates += 1;
        } else {
            state.insert_failure_record(FailureRecord {
                student_id: student.id.clone(),
                student_name: student.full_name.clone(),
                national_id: student.national_id.clone(),
                email: student.email.clone(),
                program_id: program_id.clone(),
                program_name: program.name.clone(),
                decided_at: now,
                gpa,
                notes: String::new(),
            })?;
            summary.new_failures += 1;
        }
    }

    Ok(summary)
}

/// Course ids the student has relevantly completed, with the final grades
/// backing them. Relevant means: live enrollment in a `Completed` classroom,
/// final grade present, course inside the program's required set.
fn relevant_completions(
    state: &StoreState,
    student: &Student,
    required: &BTreeSet<CourseId>,
) -> (BTreeSet<CourseId>, Vec<f64>) {
    let mut completed = BTreeSet::new();
    let mut grades = Vec::new();

    for enrollment in state.student_enrollments(&student.id) {
        let Some(final_grade) = enrollment.final_grade else {
            continue;
        };
        let Ok(classroom) = state.classroom(&enrollment.classroom_id) else {
            continue;
        };
        if classroom.status != super::domain::ClassroomStatus::Completed {
            continue;
        }
        if !required.contains(&classroom.course_id) {
            continue;
        }
        completed.insert(classroom.course_id.clone());
        grades.push(final_grade);
    }

    (completed, grades)
}

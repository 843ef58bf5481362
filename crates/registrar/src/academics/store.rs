use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::domain::{
    Classroom, ClassroomId, ClassroomStatus, Course, CourseId, Enrollment, EnrollmentId, Program,
    ProgramId, Student, StudentId,
};
use super::error::AcademicError;
use super::outcomes::{ArchivedClassroom, FailureRecord, GraduationRecord};

/// Shared persisted state behind a single lock.
///
/// Operations never mutate this through `&mut` access directly; they go
/// through [`AcademicStore::transaction`], which hands out a working copy and
/// commits it only when the closure succeeds. Concurrent administrator
/// sessions therefore observe serializable behavior, and any error rolls the
/// whole unit of work back.
#[derive(Debug, Default, Clone)]
pub struct StoreState {
    pub(crate) students: HashMap<StudentId, Student>,
    pub(crate) programs: HashMap<ProgramId, Program>,
    pub(crate) courses: HashMap<CourseId, Course>,
    pub(crate) classrooms: HashMap<ClassroomId, Classroom>,
    pub(crate) enrollments: HashMap<EnrollmentId, Enrollment>,
    pub(crate) graduation_records: Vec<GraduationRecord>,
    pub(crate) failure_records: Vec<FailureRecord>,
    pub(crate) archived_classrooms: Vec<ArchivedClassroom>,
    outcome_index: BTreeSet<(StudentId, ProgramId)>,
    enrollment_sequence: u64,
}

impl StoreState {
    pub fn insert_program(&mut self, program: Program) {
        self.programs.insert(program.id.clone(), program);
    }

    pub fn insert_course(&mut self, course: Course) {
        self.courses.insert(course.id.clone(), course);
    }

    pub fn insert_student(&mut self, student: Student) {
        self.students.insert(student.id.clone(), student);
    }

    pub fn insert_classroom(&mut self, classroom: Classroom) {
        self.classrooms.insert(classroom.id.clone(), classroom);
    }

    pub fn classroom(&self, id: &ClassroomId) -> Result<&Classroom, AcademicError> {
        self.classrooms
            .get(id)
            .ok_or_else(|| AcademicError::ClassroomNotFound(id.clone()))
    }

    pub(crate) fn classroom_mut(&mut self, id: &ClassroomId) -> Result<&mut Classroom, AcademicError> {
        self.classrooms
            .get_mut(id)
            .ok_or_else(|| AcademicError::ClassroomNotFound(id.clone()))
    }

    pub fn program(&self, id: &ProgramId) -> Result<&Program, AcademicError> {
        self.programs
            .get(id)
            .ok_or_else(|| AcademicError::ProgramNotFound(id.clone()))
    }

    pub fn course(&self, id: &CourseId) -> Result<&Course, AcademicError> {
        self.courses
            .get(id)
            .ok_or_else(|| AcademicError::CourseNotFound(id.clone()))
    }

    pub fn student(&self, id: &StudentId) -> Result<&Student, AcademicError> {
        self.students
            .get(id)
            .ok_or_else(|| AcademicError::StudentNotFound(id.clone()))
    }

    /// Live enrollments of one classroom, ordered by enrollment id so batch
    /// operations behave deterministically.
    pub fn classroom_enrollments(&self, id: &ClassroomId) -> Vec<&Enrollment> {
        let mut rows: Vec<&Enrollment> = self
            .enrollments
            .values()
            .filter(|enrollment| enrollment.classroom_id == *id)
            .collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        rows
    }

    /// Live enrollments of one student across all classrooms.
    pub fn student_enrollments(&self, id: &StudentId) -> Vec<&Enrollment> {
        let mut rows: Vec<&Enrollment> = self
            .enrollments
            .values()
            .filter(|enrollment| enrollment.student_id == *id)
            .collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        rows
    }

    /// Enroll a student, enforcing the capacity invariant and the
    /// active-classroom gate at the storage level.
    pub fn enroll_student(
        &mut self,
        classroom_id: &ClassroomId,
        student_id: &StudentId,
        now: DateTime<Utc>,
    ) -> Result<EnrollmentId, AcademicError> {
        let classroom = self.classroom(classroom_id)?;
        if classroom.status != ClassroomStatus::Active {
            return Err(AcademicError::InvalidState {
                id: classroom_id.clone(),
                actual: classroom.status,
                expected: ClassroomStatus::Active,
            });
        }
        let capacity = classroom.capacity;
        self.student(student_id)?;

        let occupied = self
            .enrollments
            .values()
            .filter(|enrollment| enrollment.classroom_id == *classroom_id)
            .count();
        if occupied >= capacity {
            return Err(AcademicError::CapacityExceeded(classroom_id.clone(), capacity));
        }
        let duplicate = self.enrollments.values().any(|enrollment| {
            enrollment.classroom_id == *classroom_id && enrollment.student_id == *student_id
        });
        if duplicate {
            return Err(AcademicError::AlreadyEnrolled(
                student_id.clone(),
                classroom_id.clone(),
            ));
        }

        self.enrollment_sequence += 1;
        let id = EnrollmentId(format!("enr-{:06}", self.enrollment_sequence));
        self.enrollments.insert(
            id.clone(),
            Enrollment {
                id: id.clone(),
                student_id: student_id.clone(),
                classroom_id: classroom_id.clone(),
                practical_grade: None,
                exam_grade: None,
                final_grade: None,
                enrolled_at: now,
            },
        );
        Ok(id)
    }

    /// Whether a terminal outcome (graduation or failure) exists for the pair.
    pub fn has_outcome(&self, student_id: &StudentId, program_id: &ProgramId) -> bool {
        self.outcome_index
            .contains(&(student_id.clone(), program_id.clone()))
    }

    /// Append a graduation record. Uniqueness of (student, program) across
    /// both record kinds is enforced here, not left to callers.
    pub fn insert_graduation_record(
        &mut self,
        record: GraduationRecord,
    ) -> Result<(), AcademicError> {
        self.claim_outcome(&record.student_id, &record.program_id)?;
        self.graduation_records.push(record);
        Ok(())
    }

    /// Append a failure record under the same uniqueness rule.
    pub fn insert_failure_record(&mut self, record: FailureRecord) -> Result<(), AcademicError> {
        self.claim_outcome(&record.student_id, &record.program_id)?;
        self.failure_records.push(record);
        Ok(())
    }

    fn claim_outcome(
        &mut self,
        student_id: &StudentId,
        program_id: &ProgramId,
    ) -> Result<(), AcademicError> {
        if !self
            .outcome_index
            .insert((student_id.clone(), program_id.clone()))
        {
            return Err(AcademicError::DuplicateOutcome(
                student_id.clone(),
                program_id.clone(),
            ));
        }
        Ok(())
    }

    /// Remove a student account together with every live enrollment that
    /// still references it. Returns whether the account existed.
    pub(crate) fn remove_student(&mut self, student_id: &StudentId) -> bool {
        self.enrollments
            .retain(|_, enrollment| enrollment.student_id != *student_id);
        self.students.remove(student_id).is_some()
    }

    /// Named predicate for the open question around archive-time account
    /// deletion: does the student still hold a live enrollment outside the
    /// given classroom? The archive pipeline consults this to warn, not to
    /// change its behavior.
    pub fn student_has_other_active_relationship(
        &self,
        student_id: &StudentId,
        excluding_classroom: &ClassroomId,
    ) -> bool {
        self.enrollments.values().any(|enrollment| {
            enrollment.student_id == *student_id
                && enrollment.classroom_id != *excluding_classroom
        })
    }

    pub fn graduation_records(&self) -> &[GraduationRecord] {
        &self.graduation_records
    }

    pub fn failure_records(&self) -> &[FailureRecord] {
        &self.failure_records
    }

    pub fn archived_classrooms(&self) -> &[ArchivedClassroom] {
        &self.archived_classrooms
    }
}

/// Transactional unit-of-work wrapper around [`StoreState`].
#[derive(Debug, Default)]
pub struct AcademicStore {
    state: Mutex<StoreState>,
}

impl AcademicStore {
    pub fn new(state: StoreState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    /// Run a read-only closure against a consistent snapshot.
    pub fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> T {
        let guard = self.state.lock().expect("academic store mutex poisoned");
        f(&guard)
    }

    /// Run a closure against a working copy of the state. The copy replaces
    /// the live state only when the closure returns `Ok`; on `Err` every
    /// change it made is discarded. Holding the lock for the whole unit of
    /// work gives the serializable isolation the archive pipeline and grade
    /// finalization require.
    pub fn transaction<T>(
        &self,
        f: impl FnOnce(&mut StoreState) -> Result<T, AcademicError>,
    ) -> Result<T, AcademicError> {
        let mut guard = self.state.lock().expect("academic store mutex poisoned");
        let mut working = guard.clone();
        let value = f(&mut working)?;
        *guard = working;
        Ok(value)
    }
}

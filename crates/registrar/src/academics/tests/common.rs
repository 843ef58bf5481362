use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::academics::archive::{ArchiveNotifier, ArchiveReceipt, NotifyError};
use crate::academics::domain::{
    Classroom, ClassroomId, ClassroomStatus, Course, CourseId, EnrollmentId, Program, ProgramId,
    Student, StudentId,
};
use crate::academics::service::RegistrarService;
use crate::academics::store::{AcademicStore, StoreState};

/// Notifier that records receipts so tests can assert the outbound hook.
#[derive(Default)]
pub(super) struct MemoryNotifier {
    receipts: Mutex<Vec<ArchiveReceipt>>,
}

impl ArchiveNotifier for MemoryNotifier {
    fn notify(&self, receipt: &ArchiveReceipt) -> Result<(), NotifyError> {
        self.receipts
            .lock()
            .expect("notifier mutex poisoned")
            .push(receipt.clone());
        Ok(())
    }
}

impl MemoryNotifier {
    pub(super) fn receipts(&self) -> Vec<ArchiveReceipt> {
        self.receipts
            .lock()
            .expect("notifier mutex poisoned")
            .clone()
    }
}

/// Notifier that always fails, used to force a rollback inside the archive
/// transaction.
pub(super) struct FailingNotifier;

impl ArchiveNotifier for FailingNotifier {
    fn notify(&self, _receipt: &ArchiveReceipt) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("injected outage".to_string()))
    }
}

pub(super) fn classroom_id(raw: &str) -> ClassroomId {
    ClassroomId(raw.to_string())
}

pub(super) fn student_id(raw: &str) -> StudentId {
    StudentId(raw.to_string())
}

pub(super) fn program_id(raw: &str) -> ProgramId {
    ProgramId(raw.to_string())
}

/// State holding only the Computer Science program.
pub(super) fn base_state() -> StoreState {
    let mut state = StoreState::default();
    state.insert_program(Program {
        id: program_id("prog-cs"),
        name: "Computer Science".to_string(),
    });
    state
}

/// Add a required course plus one active classroom teaching it.
pub(super) fn add_course(state: &mut StoreState, course: &str, classroom: &str, name: &str) {
    state.insert_course(Course {
        id: CourseId(course.to_string()),
        name: name.to_string(),
        program_id: program_id("prog-cs"),
    });
    state.insert_classroom(Classroom {
        id: classroom_id(classroom),
        name: format!("{name} 2026"),
        course_id: CourseId(course.to_string()),
        teacher_name: Some("Barbara Liskov".to_string()),
        capacity: 10,
        status: ClassroomStatus::Active,
    });
}

pub(super) fn add_student(state: &mut StoreState, id: &str, name: &str) {
    state.insert_student(Student {
        id: student_id(id),
        full_name: name.to_string(),
        national_id: format!("nid-{id}"),
        email: format!("{id}@example.edu"),
        program_id: program_id("prog-cs"),
    });
}

pub(super) fn service_over(
    state: StoreState,
) -> (Arc<RegistrarService<MemoryNotifier>>, Arc<MemoryNotifier>) {
    let notifier = Arc::new(MemoryNotifier::default());
    let service = RegistrarService::new(Arc::new(AcademicStore::new(state)), notifier.clone());
    (Arc::new(service), notifier)
}

pub(super) fn failing_service(state: StoreState) -> RegistrarService<FailingNotifier> {
    RegistrarService::new(Arc::new(AcademicStore::new(state)), Arc::new(FailingNotifier))
}

/// Two-course Computer Science fixture with two students.
pub(super) fn cs_pipeline() -> (Arc<RegistrarService<MemoryNotifier>>, Arc<MemoryNotifier>) {
    let mut state = base_state();
    add_course(&mut state, "course-algo", "class-algo", "Algorithms");
    add_course(&mut state, "course-db", "class-db", "Databases");
    add_student(&mut state, "stu-ada", "Ada Lovelace");
    add_student(&mut state, "stu-alan", "Alan Turing");
    service_over(state)
}

pub(super) fn enroll<N: ArchiveNotifier + 'static>(
    service: &RegistrarService<N>,
    classroom: &str,
    student: &str,
) -> EnrollmentId {
    service
        .enroll_student(&classroom_id(classroom), &student_id(student))
        .expect("enrollment accepted")
}

/// Enroll, grade, finalize, and complete one classroom in a single sweep.
pub(super) fn run_course<N: ArchiveNotifier + 'static>(
    service: &RegistrarService<N>,
    classroom: &str,
    results: &[(&str, f64, f64)],
) {
    let id = classroom_id(classroom);
    for (student, practical, exam) in results {
        let enrollment = enroll(service, classroom, student);
        service
            .record_raw_grades(&id, &enrollment, *practical, *exam)
            .expect("raw grades accepted");
    }
    service
        .finalize_classroom_grades(&id)
        .expect("classroom finalizes");
    service.mark_completed(&id).expect("classroom completes");
}

pub(super) fn final_grade_of<N: ArchiveNotifier + 'static>(
    service: &RegistrarService<N>,
    enrollment: &EnrollmentId,
) -> Option<f64> {
    service.store().read(|state| {
        state
            .enrollments
            .get(enrollment)
            .expect("enrollment present")
            .final_grade
    })
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

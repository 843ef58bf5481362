use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

use registrar::academics::{
    ArchiveNotifier, ArchiveReceipt, Classroom, ClassroomId, ClassroomStatus, Course, CourseId,
    NotifyError, Program, ProgramId, StoreState, Student, StudentId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Archive notification sink for deployments without a records-office feed:
/// receipts are written to the log, and dispatch never fails.
#[derive(Default, Clone)]
pub(crate) struct LogNotifier;

impl ArchiveNotifier for LogNotifier {
    fn notify(&self, receipt: &ArchiveReceipt) -> Result<(), NotifyError> {
        info!(
            classroom = %receipt.classroom_id,
            enrollments = receipt.enrollments_archived,
            students = receipt.students_removed,
            "archive receipt issued"
        );
        Ok(())
    }
}

/// Seed data for the serve and demo commands: one program, two required
/// courses with an active classroom each, and a handful of students.
pub(crate) fn seeded_state() -> StoreState {
    let mut state = StoreState::default();
    let program = ProgramId("prog-se".to_string());
    state.insert_program(Program {
        id: program.clone(),
        name: "Software Engineering".to_string(),
    });

    for (course, classroom, name, teacher) in [
        (
            "course-foundations",
            "class-foundations",
            "Programming Foundations",
            "Maria Santos",
        ),
        (
            "course-distributed",
            "class-distributed",
            "Distributed Systems",
            "Theo Anders",
        ),
    ] {
        state.insert_course(Course {
            id: CourseId(course.to_string()),
            name: name.to_string(),
            program_id: program.clone(),
        });
        state.insert_classroom(Classroom {
            id: ClassroomId(classroom.to_string()),
            name: format!("{name} - Spring 2026"),
            course_id: CourseId(course.to_string()),
            teacher_name: Some(teacher.to_string()),
            capacity: 30,
            status: ClassroomStatus::Active,
        });
    }

    for (id, name, national_id, email) in [
        ("stu-1001", "Lina Haddad", "29104418", "lina.haddad@example.edu"),
        ("stu-1002", "Omar Farouk", "30077821", "omar.farouk@example.edu"),
        ("stu-1003", "Yara Khalil", "29885310", "yara.khalil@example.edu"),
    ] {
        state.insert_student(Student {
            id: StudentId(id.to_string()),
            full_name: name.to_string(),
            national_id: national_id.to_string(),
            email: email.to_string(),
            program_id: program.clone(),
        });
    }

    state
}

//! End-to-end coverage of the academic lifecycle pipeline through the public
//! facade and HTTP router: grade entry and finalization, completion, batch
//! evaluation, and the atomic archive, exercised without reaching into
//! private modules.

mod common {
    use std::sync::{Arc, Mutex};

    use registrar::academics::{
        AcademicStore, ArchiveNotifier, ArchiveReceipt, Classroom, ClassroomId, ClassroomStatus,
        Course, CourseId, NotifyError, Program, ProgramId, RegistrarService, StoreState, Student,
        StudentId,
    };

    #[derive(Default)]
    pub(super) struct RecordingNotifier {
        receipts: Mutex<Vec<ArchiveReceipt>>,
    }

    impl ArchiveNotifier for RecordingNotifier {
        fn notify(&self, receipt: &ArchiveReceipt) -> Result<(), NotifyError> {
            self.receipts
                .lock()
                .expect("notifier mutex poisoned")
                .push(receipt.clone());
            Ok(())
        }
    }

    impl RecordingNotifier {
        pub(super) fn receipts(&self) -> Vec<ArchiveReceipt> {
            self.receipts
                .lock()
                .expect("notifier mutex poisoned")
                .clone()
        }
    }

    pub(super) fn seeded_state() -> StoreState {
        let mut state = StoreState::default();
        state.insert_program(Program {
            id: ProgramId("prog-se".to_string()),
            name: "Software Engineering".to_string(),
        });
        for (course, classroom, name) in [
            ("course-rust", "class-rust", "Systems Programming"),
            ("course-arch", "class-arch", "Software Architecture"),
        ] {
            state.insert_course(Course {
                id: CourseId(course.to_string()),
                name: name.to_string(),
                program_id: ProgramId("prog-se".to_string()),
            });
            state.insert_classroom(Classroom {
                id: ClassroomId(classroom.to_string()),
                name: format!("{name} 2026"),
                course_id: CourseId(course.to_string()),
                teacher_name: Some("Niklaus Wirth".to_string()),
                capacity: 25,
                status: ClassroomStatus::Active,
            });
        }
        for (id, name) in [
            ("stu-grace", "Grace Hopper"),
            ("stu-donald", "Donald Knuth"),
        ] {
            state.insert_student(Student {
                id: StudentId(id.to_string()),
                full_name: name.to_string(),
                national_id: format!("nid-{id}"),
                email: format!("{id}@example.edu"),
                program_id: ProgramId("prog-se".to_string()),
            });
        }
        state
    }

    pub(super) fn build_service() -> (
        Arc<RegistrarService<RecordingNotifier>>,
        Arc<RecordingNotifier>,
    ) {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = RegistrarService::new(
            Arc::new(AcademicStore::new(seeded_state())),
            notifier.clone(),
        );
        (Arc::new(service), notifier)
    }
}

use axum::http::StatusCode;
use registrar::academics::{academics_router, AcademicError, ClassroomId, ProgramId, StudentId};
use serde_json::{json, Value};
use tower::ServiceExt;

fn classroom(raw: &str) -> ClassroomId {
    ClassroomId(raw.to_string())
}

fn run_classroom(
    service: &registrar::academics::RegistrarService<common::RecordingNotifier>,
    id: &str,
    results: &[(&str, f64, f64)],
) {
    for (student, practical, exam) in results {
        let enrollment = service
            .enroll_student(&classroom(id), &StudentId(student.to_string()))
            .expect("enrollment accepted");
        service
            .record_raw_grades(&classroom(id), &enrollment, *practical, *exam)
            .expect("raw grades accepted");
    }
    service
        .finalize_classroom_grades(&classroom(id))
        .expect("classroom finalizes");
    service
        .mark_completed(&classroom(id))
        .expect("classroom completes");
}

#[test]
fn full_pipeline_from_grades_to_archive() {
    let (service, notifier) = common::build_service();
    let program = ProgramId("prog-se".to_string());

    run_classroom(
        &service,
        "class-rust",
        &[("stu-grace", 92.0, 88.0), ("stu-donald", 45.0, 35.0)],
    );
    run_classroom(
        &service,
        "class-arch",
        &[("stu-grace", 80.0, 90.0), ("stu-donald", 50.0, 54.0)],
    );

    // Archive must refuse before the evaluator has classified everyone.
    let premature = service.archive_classroom(&classroom("class-rust"));
    assert!(matches!(
        premature,
        Err(AcademicError::UnresolvedOutcome { .. })
    ));

    let summary = service.evaluate_program(&program).expect("evaluation runs");
    assert_eq!(summary.new_graduates, 1);
    assert_eq!(summary.new_failures, 1);

    service.store().read(|state| {
        let graduate = &state.graduation_records()[0];
        assert_eq!(graduate.student_name, "Grace Hopper");
        // (92+88)/2 = 90 and (80+90)/2 = 85 average to 87.5.
        assert_eq!(graduate.gpa, 87.5);
        let failure = &state.failure_records()[0];
        assert_eq!(failure.student_name, "Donald Knuth");
        assert_eq!(failure.gpa, 46.0);
    });

    for id in ["class-rust", "class-arch"] {
        service
            .archive_classroom(&classroom(id))
            .expect("archive succeeds");
    }

    service.store().read(|state| {
        assert_eq!(state.archived_classrooms().len(), 2);
        assert!(state.classroom(&classroom("class-rust")).is_err());
        assert!(state.student(&StudentId("stu-grace".to_string())).is_err());
        // Outcome records outlive the archived rows.
        assert_eq!(state.graduation_records().len(), 1);
        assert_eq!(state.failure_records().len(), 1);
    });
    assert_eq!(notifier.receipts().len(), 2);
}

#[tokio::test]
async fn pipeline_is_drivable_over_http() {
    let (service, _) = common::build_service();
    run_classroom(&service, "class-rust", &[("stu-grace", 92.0, 88.0)]);
    run_classroom(&service, "class-arch", &[("stu-grace", 80.0, 90.0)]);
    let router = academics_router(service.clone());

    let evaluate = router
        .clone()
        .oneshot(
            axum::http::Request::post("/api/v1/graduation-evaluator/program/prog-se/run")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(evaluate.status(), StatusCode::OK);
    let counts = read_body(evaluate).await;
    assert_eq!(counts.get("newGraduates"), Some(&json!(1)));

    let archive = router
        .oneshot(
            axum::http::Request::post("/api/v1/archive/class-rust")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(archive.status(), StatusCode::OK);
    let payload = read_body(archive).await;
    assert_eq!(payload.get("success"), Some(&json!(true)));

    service
        .store()
        .read(|state| assert!(state.classroom(&classroom("class-rust")).is_err()));
}

async fn read_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

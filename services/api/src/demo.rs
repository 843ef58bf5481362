use clap::Args;
use std::sync::Arc;

use crate::infra::{seeded_state, LogNotifier};
use registrar::academics::{
    AcademicStore, ClassroomId, GradingPolicy, ProgramId, RegistrarService, StudentId,
};
use registrar::error::AppError;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the graduation GPA threshold (defaults to 60)
    #[arg(long)]
    pub(crate) passing_gpa: Option<f64>,
    /// Stop after the evaluation step and leave the classrooms live
    #[arg(long)]
    pub(crate) skip_archive: bool,
}

/// Drive the whole pipeline against the seeded in-memory store so the flow
/// can be inspected without an HTTP client.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let policy = GradingPolicy {
        passing_gpa: args.passing_gpa.unwrap_or_else(|| GradingPolicy::default().passing_gpa),
    };
    let store = Arc::new(AcademicStore::new(seeded_state()));
    let service = RegistrarService::with_policy(store, Arc::new(LogNotifier), policy);
    let program = ProgramId("prog-se".to_string());

    println!("Academic lifecycle demo (passing GPA {})", policy.passing_gpa);

    let term: &[(&str, &[(&str, f64, f64)])] = &[
        (
            "class-foundations",
            &[
                ("stu-1001", 88.0, 92.0),
                ("stu-1002", 41.0, 45.0),
                ("stu-1003", 70.0, 64.0),
            ],
        ),
        (
            "class-distributed",
            &[
                ("stu-1001", 79.0, 83.0),
                ("stu-1002", 52.0, 48.0),
                ("stu-1003", 58.0, 66.0),
            ],
        ),
    ];

    for (classroom, grades) in term {
        let classroom_id = ClassroomId(classroom.to_string());
        for (student, practical, exam) in *grades {
            let enrollment =
                service.enroll_student(&classroom_id, &StudentId(student.to_string()))?;
            service.record_raw_grades(&classroom_id, &enrollment, *practical, *exam)?;
        }
        let outcome = service.finalize_classroom_grades(&classroom_id)?;
        service.mark_completed(&classroom_id)?;
        println!(
            "- {}: {} final grades recorded, classroom completed",
            classroom, outcome.enrollments_finalized
        );
    }

    let summary = service.evaluate_program(&program)?;
    println!(
        "\nEvaluation: {} new graduates, {} new failures",
        summary.new_graduates, summary.new_failures
    );
    service.store().read(|state| {
        for record in state.graduation_records() {
            println!("  graduated: {} (GPA {:.1})", record.student_name, record.gpa);
        }
        for record in state.failure_records() {
            println!("  failed:    {} (GPA {:.1})", record.student_name, record.gpa);
        }
    });

    if args.skip_archive {
        println!("\nArchive skipped; classrooms remain live.");
        return Ok(());
    }

    println!();
    for (classroom, _) in term {
        let receipt = service.archive_classroom(&ClassroomId(classroom.to_string()))?;
        println!(
            "- archived '{}': {} enrollments, {} student accounts removed",
            receipt.classroom_name, receipt.enrollments_archived, receipt.students_removed
        );
    }

    service.store().read(|state| {
        match serde_json::to_string_pretty(state.archived_classrooms()) {
            Ok(json) => println!("\nArchived snapshots:\n{json}"),
            Err(err) => println!("\nArchived snapshots unavailable: {err}"),
        }
    });

    Ok(())
}

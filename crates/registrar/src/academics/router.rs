use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::archive::ArchiveNotifier;
use super::domain::{ClassroomId, EnrollmentId, ProgramId};
use super::error::AcademicError;
use super::service::RegistrarService;

/// Router builder exposing the grade ledger, lifecycle, evaluator, and
/// archive operation groups.
pub fn academics_router<N>(service: Arc<RegistrarService<N>>) -> Router
where
    N: ArchiveNotifier + 'static,
{
    Router::new()
        .route(
            "/api/v1/grade-ledger/:classroom_id/raw-grades",
            post(raw_grades_handler::<N>),
        )
        .route(
            "/api/v1/grade-ledger/:classroom_id/finalize",
            post(finalize_handler::<N>),
        )
        .route(
            "/api/v1/classroom-lifecycle/:classroom_id/complete",
            post(complete_handler::<N>),
        )
        .route(
            "/api/v1/classroom-lifecycle/:classroom_id/reactivate",
            post(reactivate_handler::<N>),
        )
        .route(
            "/api/v1/graduation-evaluator/program/:program_id/run",
            post(evaluate_handler::<N>),
        )
        .route("/api/v1/archive/:classroom_id", post(archive_handler::<N>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawGradesRequest {
    pub(crate) enrollment_id: String,
    pub(crate) practical: f64,
    pub(crate) exam: f64,
}

pub(crate) async fn raw_grades_handler<N>(
    State(service): State<Arc<RegistrarService<N>>>,
    Path(classroom_id): Path<String>,
    axum::Json(payload): axum::Json<RawGradesRequest>,
) -> Response
where
    N: ArchiveNotifier + 'static,
{
    let classroom_id = ClassroomId(classroom_id);
    let enrollment_id = EnrollmentId(payload.enrollment_id);
    match service.record_raw_grades(
        &classroom_id,
        &enrollment_id,
        payload.practical,
        payload.exam,
    ) {
        Ok(()) => {
            let payload = json!({
                "classroom_id": classroom_id.0,
                "enrollment_id": enrollment_id.0,
                "recorded": true,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn finalize_handler<N>(
    State(service): State<Arc<RegistrarService<N>>>,
    Path(classroom_id): Path<String>,
) -> Response
where
    N: ArchiveNotifier + 'static,
{
    match service.finalize_classroom_grades(&ClassroomId(classroom_id)) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn complete_handler<N>(
    State(service): State<Arc<RegistrarService<N>>>,
    Path(classroom_id): Path<String>,
) -> Response
where
    N: ArchiveNotifier + 'static,
{
    let classroom_id = ClassroomId(classroom_id);
    match service.mark_completed(&classroom_id) {
        Ok(()) => status_payload(&classroom_id, "completed"),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reactivate_handler<N>(
    State(service): State<Arc<RegistrarService<N>>>,
    Path(classroom_id): Path<String>,
) -> Response
where
    N: ArchiveNotifier + 'static,
{
    let classroom_id = ClassroomId(classroom_id);
    match service.reactivate(&classroom_id) {
        Ok(()) => status_payload(&classroom_id, "active"),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn evaluate_handler<N>(
    State(service): State<Arc<RegistrarService<N>>>,
    Path(program_id): Path<String>,
) -> Response
where
    N: ArchiveNotifier + 'static,
{
    match service.evaluate_program(&ProgramId(program_id)) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Archive keeps the `{success, message}` envelope callers expect: no partial
/// archive is ever observable, so the message alone describes the outcome.
pub(crate) async fn archive_handler<N>(
    State(service): State<Arc<RegistrarService<N>>>,
    Path(classroom_id): Path<String>,
) -> Response
where
    N: ArchiveNotifier + 'static,
{
    match service.archive_classroom(&ClassroomId(classroom_id)) {
        Ok(receipt) => {
            let payload = json!({
                "success": true,
                "message": format!(
                    "classroom '{}' archived with {} enrollments",
                    receipt.classroom_name, receipt.enrollments_archived
                ),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => {
            let payload = json!({
                "success": false,
                "message": error.to_string(),
            });
            (error.status_code(), axum::Json(payload)).into_response()
        }
    }
}

fn status_payload(classroom_id: &ClassroomId, status: &str) -> Response {
    let payload = json!({
        "classroom_id": classroom_id.0,
        "status": status,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

fn error_response(error: AcademicError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (error.status_code(), axum::Json(payload)).into_response()
}

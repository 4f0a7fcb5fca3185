use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, instrument};
use utoipa::{IntoParams, ToSchema};

use crate::api::{flow_error, upstream_error};
use crate::console::filter::{FilterCriteria, filter_attendance};
use crate::console::forms::{AttendanceDraft, AttendanceDraftPatch};
use crate::console::submission::{Draft, SubmitOutcome};
use crate::console::summary::{AttendanceSummary, summarize};
use crate::console::window::{DateWindow, DateWindowKind};
use crate::model::attendance::AttendanceRecord;
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    /// Case-insensitive part of the employee name
    #[param(example = "ali")]
    pub employee: Option<String>,
    /// Date window relative to today
    pub window: Option<DateWindowKind>,
}

#[derive(Serialize, ToSchema)]
#[schema(example = json!({
    "data": [{
        "id": 42,
        "employee_id": 7,
        "employee_name": "Alice Smith",
        "date": "2024-06-10",
        "status": "Present",
        "created_at": "2024-06-10T09:12:44+00:00"
    }],
    "total": 1,
    "window": { "type": "day", "date": "2024-06-10" },
    "filters_active": true,
    "summary": { "present": 1, "absent": 0, "unrecognized": 0, "total": 1 }
}))]
pub struct AttendanceListResponse {
    pub data: Vec<AttendanceRecord>,
    pub total: usize,
    #[schema(value_type = Object)]
    pub window: DateWindow,
    pub filters_active: bool,
    pub summary: AttendanceSummary,
}

/// Filtered attendance list
#[utoipa::path(
    get,
    path = "/api/console/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Records matching the filters, in server order", body = AttendanceListResponse),
        (status = 502, description = "HRMS API unavailable", body = Object, example = json!({
            "message": "Failed to load attendance records"
        }))
    ),
    tag = "Attendance"
)]
#[instrument(name = "console_attendance_list", skip(state, query), fields(window = ?query.window))]
pub async fn list_attendance(
    state: web::Data<AppState>,
    query: web::Query<AttendanceQuery>,
) -> impl Responder {
    let query = query.into_inner();

    let records = match state.api.list_attendance(None).await {
        Ok(records) => records,
        Err(e) => {
            error!(error = %e, "Failed to load attendance");
            return upstream_error(&e, "Failed to load attendance records");
        }
    };

    let window = DateWindow::resolve(query.window, state.clock.today());
    let criteria = FilterCriteria::new(query.employee.unwrap_or_default(), window);
    let view = filter_attendance(&records, &criteria);
    let summary = summarize(view.iter().copied());

    debug!(loaded = records.len(), shown = view.len(), "Attendance filtered");

    HttpResponse::Ok().json(AttendanceListResponse {
        total: view.len(),
        data: view.into_iter().cloned().collect(),
        window,
        filters_active: criteria.is_active(),
        summary,
    })
}

/// Attendance history of one employee
#[utoipa::path(
    get,
    path = "/api/console/attendance/employee/{employee_id}",
    params(
        ("employee_id" = u64, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Records of the employee, in server order", body = [AttendanceRecord]),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee with ID 9 not found"
        }))
    ),
    tag = "Attendance"
)]
pub async fn list_employee_attendance(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> impl Responder {
    let employee_id = path.into_inner();

    match state.api.list_employee_attendance(employee_id).await {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => {
            error!(error = %e, employee_id, "Failed to load employee attendance");
            upstream_error(&e, "Failed to load attendance records")
        }
    }
}

/// Current state of the "mark attendance" form
#[utoipa::path(
    get,
    path = "/api/console/attendance/form",
    responses(
        (status = 200, description = "Form state", body = Object, example = json!({
            "phase": "editing",
            "draft": { "employee_id": "", "date": "2024-06-10", "status": "Present" },
            "can_submit": false,
            "error": null,
            "success": null,
            "reset_scheduled": false,
            "completed": 0
        }))
    ),
    tag = "Attendance"
)]
pub async fn get_attendance_form(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.attendance_form.view())
}

/// Edit the "mark attendance" draft
#[utoipa::path(
    put,
    path = "/api/console/attendance/form",
    request_body = AttendanceDraftPatch,
    responses(
        (status = 200, description = "Updated form state", body = Object),
        (status = 409, description = "Form is submitting or about to reset", body = Object, example = json!({
            "message": "a submission is already in progress"
        }))
    ),
    tag = "Attendance"
)]
pub async fn update_attendance_form(
    state: web::Data<AppState>,
    patch: web::Json<AttendanceDraftPatch>,
) -> impl Responder {
    let patch = patch.into_inner();

    match state.attendance_form.edit(|draft| patch.apply(draft)) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => flow_error(&e),
    }
}

/// Submit the "mark attendance" draft
#[utoipa::path(
    post,
    path = "/api/console/attendance/form/submit",
    responses(
        (status = 201, description = "Attendance marked, form resets shortly", body = Object, example = json!({
            "message": "Attendance marked successfully! The form will reset shortly."
        })),
        (status = 400, description = "HRMS API rejected the attendance", body = Object, example = json!({
            "message": "Attendance already marked for employee Alice Smith on 2024-06-10"
        })),
        (status = 409, description = "Form is submitting or about to reset"),
        (status = 422, description = "Draft incomplete or dated in the future", body = Object, example = json!({
            "message": "employee_id is required"
        }))
    ),
    tag = "Attendance"
)]
#[instrument(name = "console_attendance_submit", skip(state))]
pub async fn submit_attendance_form(state: web::Data<AppState>) -> impl Responder {
    let api = Arc::clone(&state.api);
    let outcome = state
        .attendance_form
        .submit(move |payload| async move { api.create_attendance(payload).await })
        .await;

    match outcome {
        Ok(SubmitOutcome::Succeeded(record)) => HttpResponse::Created().json(json!({
            "message": AttendanceDraft::SUCCESS_MESSAGE,
            "record": record,
            "form": state.attendance_form.view(),
        })),
        Ok(SubmitOutcome::Failed(message)) => HttpResponse::BadRequest().json(json!({
            "message": message,
            "form": state.attendance_form.view(),
        })),
        Err(e) => flow_error(&e),
    }
}

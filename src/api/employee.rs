use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, instrument};
use utoipa::{IntoParams, ToSchema};

use crate::api::{flow_error, upstream_error};
use crate::console::filter::search_employees;
use crate::console::forms::{EmployeeDraft, EmployeeDraftPatch};
use crate::console::submission::{Draft, SubmitOutcome};
use crate::model::employee::Employee;
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmployeeQuery {
    /// Matches name, email, employee ID or department, case-insensitively
    #[param(example = "engineering")]
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    #[schema(
    example = json!([{
        "id": 1,
        "employee_id": "EMP001",
        "full_name": "John Doe",
        "email": "john.doe@example.com",
        "department": "Engineering",
        "created_at": "2024-06-01T08:00:00+00:00"
    }])
)]
    pub data: Vec<Employee>,
    #[schema(example = 1)]
    pub total: usize,
}

/// List employees
#[utoipa::path(
    get,
    path = "/api/console/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Employees matching the search, in server order", body = EmployeeListResponse),
        (status = 502, description = "HRMS API unavailable", body = Object, example = json!({
            "message": "Failed to load employees"
        }))
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    state: web::Data<AppState>,
    query: web::Query<EmployeeQuery>,
) -> impl Responder {
    let employees = match state.api.list_employees().await {
        Ok(employees) => employees,
        Err(e) => {
            error!(error = %e, "Failed to load employees");
            return upstream_error(&e, "Failed to load employees");
        }
    };

    let search = query.search.as_deref().unwrap_or_default();
    let data: Vec<Employee> = search_employees(&employees, search)
        .into_iter()
        .cloned()
        .collect();

    HttpResponse::Ok().json(EmployeeListResponse {
        total: data.len(),
        data,
    })
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/console/employees/{id}",
    params(
        ("id" = u64, Path, description = "Employee database ID")
    ),
    responses(
        (status = 200, description = "Employee deleted successfully", body = Object, example = json!({
            "message": "Employee deleted successfully"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee with ID 9 not found"
        }))
    ),
    tag = "Employee"
)]
#[instrument(name = "console_employee_delete", skip(state))]
pub async fn delete_employee(state: web::Data<AppState>, path: web::Path<u64>) -> impl Responder {
    let id = path.into_inner();

    match state.api.delete_employee(id).await {
        Ok(()) => {
            info!(id, "Employee deleted");
            HttpResponse::Ok().json(json!({
                "message": "Employee deleted successfully"
            }))
        }
        Err(e) => {
            error!(error = %e, id, "Failed to delete employee");
            upstream_error(&e, "Failed to delete employee")
        }
    }
}

/// Department options for the employee form
#[utoipa::path(
    get,
    path = "/api/console/employees/departments",
    responses(
        (status = 200, description = "Remote departments, or the built-in list when unavailable", body = crate::model::department::Departments)
    ),
    tag = "Employee"
)]
pub async fn list_departments(state: web::Data<AppState>) -> impl Responder {
    let departments = state.departments.get_or_fetch(state.api.as_ref()).await;
    HttpResponse::Ok().json(departments.as_ref())
}

/// Current state of the "add employee" form
#[utoipa::path(
    get,
    path = "/api/console/employees/form",
    responses(
        (status = 200, description = "Form state", body = Object, example = json!({
            "phase": "editing",
            "draft": { "employee_id": "", "full_name": "", "email": "", "department": "" },
            "can_submit": false,
            "error": null,
            "success": null,
            "reset_scheduled": false,
            "completed": 0
        }))
    ),
    tag = "Employee"
)]
pub async fn get_employee_form(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.employee_form.view())
}

/// Edit the "add employee" draft
#[utoipa::path(
    put,
    path = "/api/console/employees/form",
    request_body = EmployeeDraftPatch,
    responses(
        (status = 200, description = "Updated form state", body = Object),
        (status = 409, description = "Form is submitting or about to reset", body = Object, example = json!({
            "message": "the form is about to reset after a successful submission"
        }))
    ),
    tag = "Employee"
)]
pub async fn update_employee_form(
    state: web::Data<AppState>,
    patch: web::Json<EmployeeDraftPatch>,
) -> impl Responder {
    let patch = patch.into_inner();

    match state.employee_form.edit(|draft| patch.apply(draft)) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => flow_error(&e),
    }
}

/// Submit the "add employee" draft
#[utoipa::path(
    post,
    path = "/api/console/employees/form/submit",
    responses(
        (status = 201, description = "Employee added, form resets shortly", body = Object, example = json!({
            "message": "Employee added successfully! The form will reset shortly."
        })),
        (status = 400, description = "HRMS API rejected the employee", body = Object, example = json!({
            "message": "Employee with this email already exists"
        })),
        (status = 409, description = "Form is submitting or about to reset"),
        (status = 422, description = "Draft incomplete or malformed", body = Object, example = json!({
            "message": "email is not valid: \"john\""
        }))
    ),
    tag = "Employee"
)]
#[instrument(name = "console_employee_submit", skip(state))]
pub async fn submit_employee_form(state: web::Data<AppState>) -> impl Responder {
    let api = Arc::clone(&state.api);
    let outcome = state
        .employee_form
        .submit(move |payload| async move { api.create_employee(payload).await })
        .await;

    match outcome {
        Ok(SubmitOutcome::Succeeded(employee)) => HttpResponse::Created().json(json!({
            "message": EmployeeDraft::SUCCESS_MESSAGE,
            "employee": employee,
            "form": state.employee_form.view(),
        })),
        Ok(SubmitOutcome::Failed(message)) => HttpResponse::BadRequest().json(json!({
            "message": message,
            "form": state.employee_form.view(),
        })),
        Err(e) => flow_error(&e),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use chrono::NaiveDate;
    use serde_json::Value;

    use super::*;
    use crate::client::stub::{StubApi, employee};
    use crate::console::clock::FixedClock;
    use crate::routes;

    fn state(api: StubApi) -> web::Data<AppState> {
        web::Data::new(AppState::for_tests(
            Arc::new(api),
            Arc::new(FixedClock(NaiveDate::from_ymd_opt(2024, 6, 12).unwrap())),
            Duration::from_millis(100),
        ))
    }

    fn staff() -> StubApi {
        let api = StubApi::default();
        *api.employees.lock() = vec![
            employee(1, "EMP001", "John Doe", "john@example.com", "Engineering"),
            employee(2, "EMP002", "Jane Roe", "jane@example.com", "Finance"),
            employee(3, "ENG-7", "Sam Poe", "sam@example.com", "Sales"),
        ];
        api
    }

    #[actix_web::test]
    async fn search_matches_any_field() {
        let app = test::init_service(
            App::new().app_data(state(staff())).configure(routes::console),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/console/employees?search=eng")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["total"], 2);
        assert_eq!(body["data"][0]["id"], 1);
        assert_eq!(body["data"][1]["id"], 3);

        let req = test::TestRequest::get().uri("/console/employees").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total"], 3);
    }

    #[actix_web::test]
    async fn delete_relays_not_found() {
        let app = test::init_service(
            App::new().app_data(state(staff())).configure(routes::console),
        )
        .await;

        let req = test::TestRequest::delete().uri("/console/employees/2").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::delete().uri("/console/employees/2").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Employee with ID 2 not found");
    }

    #[actix_web::test]
    async fn departments_fall_back_to_defaults() {
        let app = test::init_service(
            App::new().app_data(state(staff())).configure(routes::console),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/console/employees/departments")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["source"], "default");
        assert_eq!(body["names"][0], "Human Resources");
    }

    #[actix_web::test]
    async fn added_employee_shows_up_after_reset() {
        let data = state(staff());
        let app = test::init_service(
            App::new().app_data(data.clone()).configure(routes::console),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/console/employees/form")
            .set_json(json!({
                "employee_id": " EMP004 ",
                "full_name": "Ada Lovelace",
                "email": "ada@example.com",
                "department": "Engineering"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["can_submit"], true);

        let mut completions = data.employee_form.subscribe();

        let req = test::TestRequest::post()
            .uri("/console/employees/form/submit")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["employee"]["employee_id"], "EMP004");
        assert_eq!(body["form"]["success"], EmployeeDraft::SUCCESS_MESSAGE);

        let req = test::TestRequest::post()
            .uri("/console/employees/form/submit")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        completions.changed().await.unwrap();

        let req = test::TestRequest::get().uri("/console/employees/form").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["phase"], "editing");
        assert_eq!(body["draft"]["full_name"], "");

        let req = test::TestRequest::get()
            .uri("/console/employees?search=lovelace")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total"], 1);
    }

    #[actix_web::test]
    async fn malformed_email_is_unprocessable() {
        let app = test::init_service(
            App::new().app_data(state(staff())).configure(routes::console),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/console/employees/form")
            .set_json(json!({
                "employee_id": "EMP005",
                "full_name": "No Domain",
                "email": "nodomain@",
                "department": "Sales"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["can_submit"], false);

        let req = test::TestRequest::post()
            .uri("/console/employees/form/submit")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

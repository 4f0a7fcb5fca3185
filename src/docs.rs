use crate::api::attendance::AttendanceListResponse;
use crate::api::employee::EmployeeListResponse;
use crate::console::forms::{
    AttendanceDraft, AttendanceDraftPatch, EmployeeDraft, EmployeeDraftPatch,
};
use crate::console::submission::FormPhase;
use crate::console::summary::{AttendanceSummary, DashboardStats};
use crate::console::window::DateWindowKind;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, CreateAttendance};
use crate::model::department::{DepartmentSource, Departments};
use crate::model::employee::{CreateEmployee, Employee};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS Console API",
        version = "1.0.0",
        description = r#"
## HRMS Console

Operator console in front of an **HRMS REST server**. It does not store anything
itself: every list is fetched from the HRMS API and shaped here.

### 🔹 Key Features
- **Attendance**
  - Filter by employee name and by today / this week / this month
  - Present, absent and unrecognized tallies for the shown records
  - "Mark attendance" form with validation and a delayed reset after success
- **Employees**
  - Search by name, email, employee ID or department
  - Delete, and an "add employee" form with department suggestions
- **Dashboard**
  - Headcount plus today's attendance tally

### 📦 Response Format
- JSON responses, errors as `{ "message": "..." }`
- Upstream HRMS errors keep their status code; an unreachable server yields 502

---
Built with **Rust**, **Actix Web**, **reqwest**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::list_attendance,
        crate::api::attendance::list_employee_attendance,
        crate::api::attendance::get_attendance_form,
        crate::api::attendance::update_attendance_form,
        crate::api::attendance::submit_attendance_form,

        crate::api::employee::list_employees,
        crate::api::employee::delete_employee,
        crate::api::employee::list_departments,
        crate::api::employee::get_employee_form,
        crate::api::employee::update_employee_form,
        crate::api::employee::submit_employee_form,

        crate::api::dashboard::get_dashboard
    ),
    components(
        schemas(
            AttendanceRecord,
            AttendanceStatus,
            CreateAttendance,
            AttendanceListResponse,
            AttendanceSummary,
            AttendanceDraft,
            AttendanceDraftPatch,
            DateWindowKind,
            Employee,
            CreateEmployee,
            EmployeeListResponse,
            EmployeeDraft,
            EmployeeDraftPatch,
            Departments,
            DepartmentSource,
            FormPhase,
            DashboardStats
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance filtering and marking"),
        (name = "Employee", description = "Employee search and onboarding"),
        (name = "Dashboard", description = "Daily overview"),
    )
)]
pub struct ApiDoc;

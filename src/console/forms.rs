//! Drafts behind the "mark attendance" and "add employee" forms.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::console::submission::{Draft, ValidationError};
use crate::model::attendance::{AttendanceStatus, CreateAttendance};
use crate::model::employee::CreateEmployee;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceDraft {
    /// Selected employee's numeric id, as entered.
    #[schema(example = "7")]
    pub employee_id: String,
    #[schema(example = "2024-06-10", format = "date", value_type = Option<String>)]
    pub date: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
}

impl Draft for AttendanceDraft {
    type Payload = CreateAttendance;

    const SUCCESS_MESSAGE: &'static str =
        "Attendance marked successfully! The form will reset shortly.";

    fn fresh(today: NaiveDate) -> Self {
        Self {
            employee_id: String::new(),
            date: Some(today),
            status: Some(AttendanceStatus::Present),
        }
    }

    fn validate(&self, today: NaiveDate) -> Result<CreateAttendance, ValidationError> {
        let raw_id = self.employee_id.trim();
        if raw_id.is_empty() {
            return Err(ValidationError::Missing("employee_id"));
        }
        let employee_id = raw_id.parse::<u64>().map_err(|_| ValidationError::Invalid {
            field: "employee_id",
            value: self.employee_id.clone(),
        })?;

        let date = self.date.ok_or(ValidationError::Missing("date"))?;
        if date > today {
            return Err(ValidationError::FutureDate(date));
        }

        let status = self.status.ok_or(ValidationError::Missing("status"))?;

        Ok(CreateAttendance {
            employee_id,
            date,
            status,
        })
    }
}

/// Partial update of an `AttendanceDraft`; absent fields are left alone.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AttendanceDraftPatch {
    #[schema(example = "7")]
    pub employee_id: Option<String>,
    #[schema(example = "2024-06-10", format = "date", value_type = Option<String>)]
    pub date: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
}

impl AttendanceDraftPatch {
    pub fn apply(self, draft: &mut AttendanceDraft) {
        if let Some(employee_id) = self.employee_id {
            draft.employee_id = employee_id;
        }
        if let Some(date) = self.date {
            draft.date = Some(date);
        }
        if let Some(status) = self.status {
            draft.status = Some(status);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EmployeeDraft {
    #[schema(example = "EMP001")]
    pub employee_id: String,
    #[schema(example = "John Doe")]
    pub full_name: String,
    #[schema(example = "john.doe@example.com")]
    pub email: String,
    #[schema(example = "Engineering")]
    pub department: String,
}

impl Draft for EmployeeDraft {
    type Payload = CreateEmployee;

    const SUCCESS_MESSAGE: &'static str =
        "Employee added successfully! The form will reset shortly.";

    fn fresh(_today: NaiveDate) -> Self {
        Self::default()
    }

    fn validate(&self, _today: NaiveDate) -> Result<CreateEmployee, ValidationError> {
        let employee_id = required("employee_id", &self.employee_id)?;
        let full_name = required("full_name", &self.full_name)?;
        let email = required("email", &self.email)?;
        let department = required("department", &self.department)?;

        let well_formed = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !well_formed {
            return Err(ValidationError::Invalid {
                field: "email",
                value: email,
            });
        }

        Ok(CreateEmployee {
            employee_id,
            full_name,
            email,
            department,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Missing(field));
    }
    Ok(value.to_owned())
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct EmployeeDraftPatch {
    pub employee_id: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
}

impl EmployeeDraftPatch {
    pub fn apply(self, draft: &mut EmployeeDraft) {
        if let Some(employee_id) = self.employee_id {
            draft.employee_id = employee_id;
        }
        if let Some(full_name) = self.full_name {
            draft.full_name = full_name;
        }
        if let Some(email) = self.email {
            draft.email = email;
        }
        if let Some(department) = self.department {
            draft.department = department;
        }
    }
}

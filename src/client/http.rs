use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{ApiError, HrmsApi};
use crate::model::attendance::{AttendanceRecord, CreateAttendance};
use crate::model::employee::{CreateEmployee, Employee};

/// `HrmsApi` over the HRMS REST server.
pub struct HttpHrmsClient {
    http: Client,
    base_url: String,
}

/// Error body returned by the HRMS server.
///
/// `detail` is a string for business errors and a list of
/// `{"loc": [...], "msg": "..."}` objects for request validation errors.
#[derive(Deserialize)]
struct ErrorBody {
    detail: Value,
}

impl HttpHrmsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn ensure_success(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), body = %body, "HRMS API rejected request");
        Err(error_from_body(status.as_u16(), &body))
    }
}

fn error_from_body(status: u16, body: &str) -> ApiError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| match b.detail {
            Value::String(s) => Some(s),
            Value::Array(items) => items
                .first()
                .and_then(|item| item.get("msg"))
                .and_then(Value::as_str)
                .map(str::to_owned),
            _ => None,
        });

    match detail {
        Some(detail) => ApiError::Rejected { status, detail },
        None => ApiError::Status { status },
    }
}

#[async_trait]
impl HrmsApi for HttpHrmsClient {
    #[instrument(skip(self))]
    async fn list_employees(&self) -> Result<Vec<Employee>, ApiError> {
        let response = self.http.get(self.url("/api/employees")).send().await?;
        Self::json(response).await
    }

    #[instrument(skip(self))]
    async fn list_departments(&self) -> Result<Vec<String>, ApiError> {
        let response = self
            .http
            .get(self.url("/api/employees/departments"))
            .send()
            .await?;
        Self::json(response).await
    }

    #[instrument(skip(self, employee), fields(employee_code = %employee.employee_id))]
    async fn create_employee(&self, employee: CreateEmployee) -> Result<Employee, ApiError> {
        let response = self
            .http
            .post(self.url("/api/employees"))
            .json(&employee)
            .send()
            .await?;
        Self::json(response).await
    }

    #[instrument(skip(self))]
    async fn delete_employee(&self, id: u64) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.url(&format!("/api/employees/{id}")))
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_attendance(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceRecord>, ApiError> {
        let mut request = self.http.get(self.url("/api/attendance"));
        if let Some(date) = date {
            request = request.query(&[("date", date.format("%Y-%m-%d").to_string())]);
        }
        Self::json(request.send().await?).await
    }

    #[instrument(skip(self))]
    async fn list_employee_attendance(
        &self,
        employee_id: u64,
    ) -> Result<Vec<AttendanceRecord>, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/api/attendance/{employee_id}")))
            .send()
            .await?;
        Self::json(response).await
    }

    #[instrument(skip(self, attendance), fields(employee_id = attendance.employee_id, date = %attendance.date))]
    async fn create_attendance(
        &self,
        attendance: CreateAttendance,
    ) -> Result<AttendanceRecord, ApiError> {
        let response = self
            .http
            .post(self.url("/api/attendance"))
            .json(&attendance)
            .send()
            .await?;
        Self::json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_surfaced() {
        let err = error_from_body(404, r#"{"detail":"Employee with ID 9 not found"}"#);
        assert_eq!(err.user_message("fallback"), "Employee with ID 9 not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn validation_detail_uses_first_message() {
        let body = r#"{"detail":[{"loc":["body","email"],"msg":"value is not a valid email address","type":"value_error"}]}"#;
        let err = error_from_body(422, body);
        assert_eq!(err.user_message("fallback"), "value is not a valid email address");
    }

    #[test]
    fn non_json_body_has_no_detail() {
        let err = error_from_body(502, "<html>Bad Gateway</html>");
        assert!(matches!(err, ApiError::Status { status: 502 }));
        assert_eq!(err.user_message("fallback"), "fallback");
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = HttpHrmsClient::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.url("/api/employees"), "http://localhost:8000/api/employees");
    }
}

//! In-memory `HrmsApi` for tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;

use super::{ApiError, HrmsApi};
use crate::model::attendance::{AttendanceRecord, CreateAttendance, RecordDate, RecordStatus};
use crate::model::employee::{CreateEmployee, Employee};

#[derive(Default)]
pub struct StubApi {
    pub employees: Mutex<Vec<Employee>>,
    pub departments: Mutex<Option<Vec<String>>>,
    pub department_calls: Mutex<usize>,
    pub attendance: Mutex<Vec<AttendanceRecord>>,
    /// When set, every write fails with this detail.
    pub reject_writes: Mutex<Option<String>>,
    pub attendance_calls: Mutex<Vec<CreateAttendance>>,
    pub attendance_dates_requested: Mutex<Vec<Option<NaiveDate>>>,
}

impl StubApi {
    pub fn with_records(records: Vec<AttendanceRecord>) -> Self {
        let stub = Self::default();
        *stub.attendance.lock() = records;
        stub
    }

    pub fn reject_with(self, detail: &str) -> Self {
        *self.reject_writes.lock() = Some(detail.to_owned());
        self
    }

    fn rejection(&self) -> Option<ApiError> {
        self.reject_writes.lock().clone().map(|detail| ApiError::Rejected {
            status: 404,
            detail,
        })
    }
}

pub fn record(id: u64, name: &str, date: &str, status: &str) -> AttendanceRecord {
    AttendanceRecord {
        id,
        employee_id: id,
        employee_name: name.to_owned(),
        date: RecordDate::new(date),
        status: RecordStatus::from(status.to_owned()),
        created_at: None,
    }
}

pub fn employee(id: u64, code: &str, name: &str, email: &str, department: &str) -> Employee {
    Employee {
        id,
        employee_id: code.to_owned(),
        full_name: name.to_owned(),
        email: email.to_owned(),
        department: department.to_owned(),
        created_at: None,
    }
}

#[async_trait]
impl HrmsApi for StubApi {
    async fn list_employees(&self) -> Result<Vec<Employee>, ApiError> {
        Ok(self.employees.lock().clone())
    }

    async fn list_departments(&self) -> Result<Vec<String>, ApiError> {
        *self.department_calls.lock() += 1;
        self.departments
            .lock()
            .clone()
            .ok_or(ApiError::Status { status: 500 })
    }

    async fn create_employee(&self, employee: CreateEmployee) -> Result<Employee, ApiError> {
        if let Some(err) = self.rejection() {
            return Err(err);
        }
        let mut employees = self.employees.lock();
        let created = Employee {
            id: employees.len() as u64 + 1,
            employee_id: employee.employee_id,
            full_name: employee.full_name,
            email: employee.email,
            department: employee.department,
            created_at: None,
        };
        employees.push(created.clone());
        Ok(created)
    }

    async fn delete_employee(&self, id: u64) -> Result<(), ApiError> {
        let mut employees = self.employees.lock();
        let before = employees.len();
        employees.retain(|e| e.id != id);
        if employees.len() == before {
            return Err(ApiError::Rejected {
                status: 404,
                detail: format!("Employee with ID {id} not found"),
            });
        }
        Ok(())
    }

    async fn list_attendance(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceRecord>, ApiError> {
        self.attendance_dates_requested.lock().push(date);
        let records = self.attendance.lock();
        Ok(records
            .iter()
            .filter(|r| date.is_none() || r.date.calendar_date() == date)
            .cloned()
            .collect())
    }

    async fn list_employee_attendance(
        &self,
        employee_id: u64,
    ) -> Result<Vec<AttendanceRecord>, ApiError> {
        Ok(self
            .attendance
            .lock()
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect())
    }

    async fn create_attendance(
        &self,
        attendance: CreateAttendance,
    ) -> Result<AttendanceRecord, ApiError> {
        self.attendance_calls.lock().push(attendance.clone());
        if let Some(err) = self.rejection() {
            return Err(err);
        }
        let mut records = self.attendance.lock();
        let created = AttendanceRecord {
            id: records.len() as u64 + 1,
            employee_id: attendance.employee_id,
            employee_name: format!("Employee {}", attendance.employee_id),
            date: RecordDate::from(attendance.date),
            status: RecordStatus::Known(attendance.status),
            created_at: None,
        };
        records.push(created.clone());
        Ok(created)
    }
}

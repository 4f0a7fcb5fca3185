//! The HRMS REST API as seen by the console.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::model::attendance::{AttendanceRecord, CreateAttendance};
use crate::model::employee::{CreateEmployee, Employee};

pub mod http;
#[cfg(test)]
pub mod stub;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with an error and explained why.
    #[error("{detail}")]
    Rejected { status: u16, detail: String },

    #[error("HRMS API responded with status {status}")]
    Status { status: u16 },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl ApiError {
    /// Server-supplied detail message, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { detail, .. } if !detail.trim().is_empty() => Some(detail.as_str()),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } | ApiError::Status { status } => Some(*status),
            ApiError::Request(e) => e.status().map(|s| s.as_u16()),
        }
    }

    /// Message to surface to the user: the server detail when present, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_owned()
    }
}

#[async_trait]
pub trait HrmsApi: Send + Sync {
    async fn list_employees(&self) -> Result<Vec<Employee>, ApiError>;

    async fn list_departments(&self) -> Result<Vec<String>, ApiError>;

    async fn create_employee(&self, employee: CreateEmployee) -> Result<Employee, ApiError>;

    async fn delete_employee(&self, id: u64) -> Result<(), ApiError>;

    /// All attendance records, optionally restricted server-side to one date.
    async fn list_attendance(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceRecord>, ApiError>;

    async fn list_employee_attendance(
        &self,
        employee_id: u64,
    ) -> Result<Vec<AttendanceRecord>, ApiError>;

    async fn create_attendance(
        &self,
        attendance: CreateAttendance,
    ) -> Result<AttendanceRecord, ApiError>;
}

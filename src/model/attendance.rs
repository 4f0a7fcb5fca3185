use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Attendance outcome as accepted by the HRMS API.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, EnumString, Display,
)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

/// Status as received on a record.
///
/// Anything other than `Present`/`Absent` is kept verbatim as `Unrecognized`
/// so it can be counted separately instead of disappearing from tallies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordStatus {
    Known(AttendanceStatus),
    Unrecognized(String),
}

impl RecordStatus {
    pub fn known(&self) -> Option<AttendanceStatus> {
        match self {
            RecordStatus::Known(status) => Some(*status),
            RecordStatus::Unrecognized(_) => None,
        }
    }
}

impl From<String> for RecordStatus {
    fn from(raw: String) -> Self {
        match raw.parse::<AttendanceStatus>() {
            Ok(status) => RecordStatus::Known(status),
            Err(_) => RecordStatus::Unrecognized(raw),
        }
    }
}

impl From<RecordStatus> for String {
    fn from(status: RecordStatus) -> Self {
        match status {
            RecordStatus::Known(status) => status.to_string(),
            RecordStatus::Unrecognized(raw) => raw,
        }
    }
}

impl From<AttendanceStatus> for RecordStatus {
    fn from(status: AttendanceStatus) -> Self {
        RecordStatus::Known(status)
    }
}

/// Record date exactly as the server sent it.
///
/// The server may append a time-of-day (`2024-06-10T00:00:00`); only the
/// leading calendar date is meaningful and no timezone shift is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordDate(String);

impl RecordDate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Calendar date of the record, or `None` when the value is malformed.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        let (date, rest) = NaiveDate::parse_and_remainder(self.0.trim(), "%Y-%m-%d").ok()?;
        if rest.is_empty() || rest.starts_with(['T', 't', ' ']) {
            Some(date)
        } else {
            None
        }
    }
}

impl From<NaiveDate> for RecordDate {
    fn from(date: NaiveDate) -> Self {
        Self(date.format("%Y-%m-%d").to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 42,
        "employee_id": 7,
        "employee_name": "Alice Smith",
        "date": "2024-06-10",
        "status": "Present",
        "created_at": "2024-06-10T09:12:44+00:00"
    })
)]
pub struct AttendanceRecord {
    #[schema(example = 42)]
    pub id: u64,

    #[schema(example = 7)]
    pub employee_id: u64,

    /// Name at the time the record was written.
    #[schema(example = "Alice Smith")]
    pub employee_name: String,

    #[schema(example = "2024-06-10", value_type = String, format = "date")]
    pub date: RecordDate,

    #[schema(example = "Present", value_type = String)]
    pub status: RecordStatus,

    #[schema(example = "2024-06-10T09:12:44+00:00", nullable = true)]
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Payload for `POST /api/attendance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateAttendance {
    #[schema(example = 7)]
    pub employee_id: u64,
    #[schema(example = "2024-06-10", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}
